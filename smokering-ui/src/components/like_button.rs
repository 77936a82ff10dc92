//! Like Button
//!
//! Toggles a like and shows the server's count afterwards.

use leptos::*;

use crate::api;
use crate::models::LikeStatus;
use crate::state::use_global;

#[component]
pub fn LikeButton(
    #[prop(into)]
    post_id: String,
    liked: bool,
    count: u32,
    /// Called with the server's answer
    #[prop(into)]
    on_change: Callback<LikeStatus>,
) -> impl IntoView {
    let state = use_global();
    let (pending, set_pending) = create_signal(false);
    let post_id = store_value(post_id);

    let toggle = move |_| {
        if pending.get_untracked() {
            return;
        }
        set_pending.set(true);
        spawn_local(async move {
            match api::set_like(&post_id.get_value(), !liked).await {
                Ok(status) => on_change.call(status),
                Err(e) => state.show_error(&e),
            }
            set_pending.set(false);
        });
    };

    view! {
        <button
            on:click=toggle
            disabled=move || pending.get() || !state.signed_in()
            class=move || {
                let base = "flex items-center space-x-1 px-3 py-1 rounded-full text-sm transition-colors";
                if liked {
                    format!("{} bg-amber-700 text-white", base)
                } else {
                    format!("{} bg-stone-700 text-stone-300 hover:bg-stone-600", base)
                }
            }
        >
            <span>{if liked { "♥" } else { "♡" }}</span>
            <span>{count}</span>
        </button>
    }
}
