//! Feed Page
//!
//! Infinite-scroll feed with sort and filter tabs, a composer and the
//! "new posts" banner raised by the freshness poller.

use leptos::*;

use crate::api;
use crate::components::{ImageUpload, ListSkeleton, PostCard, Sentinel};
use crate::state::{
    use_feed, use_freshness_polling, use_global, FeedFilter, FeedKey, FeedSort, FetchStatus,
};

#[component]
pub fn Feed() -> impl IntoView {
    let feed = use_feed();
    let state = use_global();

    // first page, unless we are coming back to an already loaded feed
    if feed.state.with_untracked(|s| s.is_empty()) {
        feed.load_next(true);
    }
    use_freshness_polling(feed);

    let posts = create_memo(move |_| feed.state.with(|s| s.posts()));
    let status = create_memo(move |_| feed.state.with(|s| s.status().clone()));
    let has_more = create_memo(move |_| feed.state.with(|s| s.has_more()));
    let key = create_memo(move |_| feed.state.with(|s| s.key));

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Feed"</h1>
                <div class="flex space-x-1 text-sm">
                    <SortTab sort=FeedSort::Newest label="Newest" current=key />
                    <SortTab sort=FeedSort::Top label="Top" current=key />
                </div>
            </div>

            <div class="flex space-x-2">
                {[FeedFilter::All, FeedFilter::Following, FeedFilter::Reviews]
                    .into_iter()
                    .map(|filter| view! { <FilterTab filter=filter current=key /> })
                    .collect_view()}
            </div>

            <Show when=move || state.signed_in()>
                <Composer />
            </Show>

            <Show when=move || feed.has_new.get()>
                <button
                    on:click=move |_| feed.refresh()
                    class="w-full py-2 rounded-lg bg-amber-700 hover:bg-amber-600 font-medium"
                >
                    "New posts - show them"
                </button>
            </Show>

            <div class="space-y-4">
                <For
                    each=move || posts.get()
                    key=|p| (p.id.clone(), p.like_count, p.liked_by_me, p.comment_count)
                    children=|post| view! { <PostCard post=post /> }
                />
            </div>

            {move || match status.get() {
                FetchStatus::Fetching => view! { <ListSkeleton count=2 /> }.into_view(),
                FetchStatus::Failed(message) => view! {
                    <div class="text-center space-y-2 py-4">
                        <p class="text-red-400">{message}</p>
                        <button
                            on:click=move |_| feed.load_next(true)
                            class="px-4 py-2 bg-stone-700 hover:bg-stone-600 rounded-lg"
                        >
                            "Try again"
                        </button>
                    </div>
                }.into_view(),
                FetchStatus::Idle if !has_more.get() && posts.with(Vec::is_empty) => view! {
                    <p class="text-center text-stone-400 py-8">"Nothing here yet."</p>
                }.into_view(),
                FetchStatus::Idle if !has_more.get() => view! {
                    <p class="text-center text-stone-500 py-4">"You're all caught up."</p>
                }.into_view(),
                FetchStatus::Idle => view! {}.into_view(),
            }}

            <Sentinel on_visible=move |visible| feed.on_sentinel(visible) />
        </div>
    }
}

#[component]
fn SortTab(sort: FeedSort, label: &'static str, current: Memo<FeedKey>) -> impl IntoView {
    let feed = use_feed();
    view! {
        <button
            on:click=move |_| feed.set_key(FeedKey { sort, ..current.get_untracked() })
            class=move || tab_class(current.get().sort == sort)
        >
            {label}
        </button>
    }
}

#[component]
fn FilterTab(filter: FeedFilter, current: Memo<FeedKey>) -> impl IntoView {
    let feed = use_feed();
    view! {
        <button
            on:click=move |_| feed.set_key(FeedKey { filter, ..current.get_untracked() })
            class=move || tab_class(current.get().filter == filter)
        >
            {filter.label()}
        </button>
    }
}

fn tab_class(active: bool) -> &'static str {
    if active {
        "px-3 py-1 rounded-full bg-amber-700 text-white"
    } else {
        "px-3 py-1 rounded-full bg-stone-800 text-stone-400 hover:text-white"
    }
}

/// New post form
#[component]
fn Composer() -> impl IntoView {
    let state = use_global();
    let feed = use_feed();
    let (body, set_body) = create_signal(String::new());
    let (image, set_image) = create_signal(None::<String>);
    let (posting, set_posting) = create_signal(false);
    // remounts the upload widget after a post
    let (round, set_round) = create_signal(0u32);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = body.get_untracked();
        let image_url = image.get_untracked();
        if text.trim().is_empty() && image_url.is_none() {
            return;
        }

        set_posting.set(true);
        spawn_local(async move {
            match api::create_post(text.trim(), image_url).await {
                Ok(_) => {
                    set_body.set(String::new());
                    set_image.set(None);
                    set_round.update(|r| *r += 1);
                    state.show_success("Posted");
                    // the new post comes back through a full refresh
                    feed.refresh();
                }
                Err(e) => state.show_error(&e),
            }
            set_posting.set(false);
        });
    };

    view! {
        <form on:submit=submit class="bg-stone-800 rounded-xl p-4 space-y-3">
            <textarea
                rows=3
                placeholder="What are you smoking?"
                prop:value=move || body.get()
                on:input=move |ev| set_body.set(event_target_value(&ev))
                class="w-full bg-stone-700 rounded-lg px-4 py-3 border border-stone-600
                       focus:border-amber-500 focus:outline-none"
            />
            <div class="flex items-center justify-between">
                {move || {
                    round.track();
                    view! { <ImageUpload on_uploaded=move |url| set_image.set(url) /> }
                }}
                <button
                    type="submit"
                    disabled=move || posting.get()
                    class="px-5 py-2 bg-amber-700 hover:bg-amber-600 disabled:bg-stone-600 rounded-lg font-medium"
                >
                    {move || if posting.get() { "Posting..." } else { "Post" }}
                </button>
            </div>
        </form>
    }
}
