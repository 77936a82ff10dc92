//! Post Detail Page
//!
//! A single post with its full comment thread.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{CommentList, Loading, PostCard};

#[component]
pub fn PostDetail() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.with(|p| p.get("id").cloned().unwrap_or_default());

    let post = create_local_resource(id, |id| async move { api::fetch_post(&id).await });

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <A href="/" class="text-sm text-stone-400 hover:text-white">"← Back to feed"</A>
            <Suspense fallback=|| view! { <Loading /> }>
                {move || post.get().map(|result| match result {
                    Ok(post) => view! {
                        <PostCard post=post.clone() />
                        <CommentList post_id=post.id />
                    }.into_view(),
                    Err(e) => view! {
                        <p class="text-red-400 text-center py-8">{e}</p>
                    }.into_view(),
                })}
            </Suspense>
        </div>
    }
}
