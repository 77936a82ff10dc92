//! Comment List
//!
//! Comments under a post, with a box to add one.

use leptos::*;

use crate::api;
use crate::models::Comment;
use crate::state::{use_feed, use_global};

#[component]
pub fn CommentList(
    #[prop(into)]
    post_id: String,
) -> impl IntoView {
    let state = use_global();
    let feed = use_feed();
    let post_id = store_value(post_id);
    let (comments, set_comments) = create_signal(Vec::<Comment>::new());
    let (draft, set_draft) = create_signal(String::new());

    spawn_local(async move {
        match api::fetch_comments(&post_id.get_value()).await {
            Ok(list) => set_comments.set(list),
            Err(e) => state.show_error(&e),
        }
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let body = draft.get_untracked();
        if body.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            let id = post_id.get_value();
            match api::add_comment(&id, body.trim()).await {
                Ok(comment) => {
                    set_comments.update(|c| c.push(comment));
                    set_draft.set(String::new());
                    feed.patch_post(&id, |p| p.comment_count += 1);
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let remove = move |comment_id: String| {
        spawn_local(async move {
            match api::delete_comment(&comment_id).await {
                Ok(()) => {
                    set_comments.update(|c| c.retain(|x| x.id != comment_id));
                    feed.patch_post(&post_id.get_value(), |p| {
                        p.comment_count = p.comment_count.saturating_sub(1)
                    });
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    view! {
        <section class="space-y-3">
            <h2 class="text-lg font-semibold">"Comments"</h2>

            <For
                each=move || comments.get()
                key=|c| c.id.clone()
                children=move |comment| {
                    let id = comment.id.clone();
                    let can_delete = state.my_id().as_deref() == Some(comment.author.id.as_str());
                    view! {
                        <div class="bg-stone-800 rounded-lg px-4 py-3">
                            <div class="flex items-center justify-between text-sm">
                                <span class="font-medium text-amber-100">{comment.author.shown_name()}</span>
                                <span class="text-stone-500">
                                    {comment.created_at.format("%b %e, %H:%M").to_string()}
                                </span>
                            </div>
                            <p class="text-stone-200 mt-1">{comment.body}</p>
                            {can_delete.then(|| view! {
                                <button
                                    on:click=move |_| remove(id.clone())
                                    class="text-xs text-stone-500 hover:text-red-400 mt-1"
                                >
                                    "Delete"
                                </button>
                            })}
                        </div>
                    }
                }
            />

            <Show when=move || state.signed_in()>
                <form on:submit=submit class="flex space-x-2">
                    <input
                        type="text"
                        placeholder="Add a comment"
                        prop:value=move || draft.get()
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        class="flex-1 bg-stone-700 rounded-lg px-4 py-2 border border-stone-600
                               focus:border-amber-500 focus:outline-none"
                    />
                    <button type="submit" class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">
                        "Send"
                    </button>
                </form>
            </Show>
        </section>
    }
}
