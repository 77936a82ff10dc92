//! Post Card
//!
//! One post in the feed: author, text, image, attached review and actions.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::LikeButton;
use crate::models::{LikeStatus, Post};
use crate::state::{use_feed, use_global};

#[component]
pub fn PostCard(post: Post) -> impl IntoView {
    let state = use_global();
    let feed = use_feed();
    let id = post.id.clone();
    let mine = state.my_id().as_deref() == Some(post.author.id.as_str());

    let on_like = {
        let id = id.clone();
        Callback::new(move |status: LikeStatus| {
            feed.patch_post(&id, |p| {
                p.liked_by_me = status.liked;
                p.like_count = status.like_count;
            });
        })
    };

    let delete = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            spawn_local(async move {
                match api::delete_post(&id).await {
                    Ok(()) => {
                        feed.remove_post(&id);
                        state.show_success("Post deleted");
                    }
                    Err(e) => state.show_error(&e),
                }
            });
        }
    };

    view! {
        <article class="bg-stone-800 rounded-xl p-5 space-y-3">
            <header class="flex items-center justify-between">
                <A href=format!("/users/{}", post.author.id) class="font-semibold text-amber-100">
                    {post.author.shown_name()}
                </A>
                <time class="text-xs text-stone-400">
                    {post.created_at.format("%b %e, %H:%M").to_string()}
                </time>
            </header>

            <p class="whitespace-pre-wrap text-stone-200">{post.body.clone()}</p>

            {post.image_url.clone().map(|url| view! {
                <img src=api::media_url(&url) class="rounded-lg max-h-96 object-cover" />
            })}

            {post.review_id.clone().map(|_| view! {
                <A href=format!("/reviews?author={}", post.author.id) class="inline-block text-xs px-2 py-1 rounded bg-stone-700 text-amber-200">
                    "Shared a review"
                </A>
            })}

            <footer class="flex items-center space-x-3">
                <LikeButton
                    post_id=id.clone()
                    liked=post.liked_by_me
                    count=post.like_count
                    on_change=on_like
                />
                <A href=format!("/posts/{}", id) class="text-sm text-stone-400 hover:text-white">
                    {format!("💬 {}", post.comment_count)}
                </A>
                {mine.then(|| view! {
                    <button on:click=delete class="ml-auto text-sm text-stone-500 hover:text-red-400">
                        "Delete"
                    </button>
                })}
            </footer>
        </article>
    }
}
