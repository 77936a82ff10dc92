//! Toasts for the success and error messages in [`GlobalState`].

use leptos::*;

use crate::state::{use_global, GlobalState};

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global();

    view! {
        <div class="fixed top-20 right-4 z-50 flex flex-col items-end space-y-2">
            {move || state.error.get().map(|text| toast_box(state, text, true))}
            {move || state.success.get().map(|text| toast_box(state, text, false))}
        </div>
    }
}

/// Click to dismiss before the timeout clears it
fn toast_box(state: GlobalState, text: String, is_error: bool) -> impl IntoView {
    let (mark, tone) = if is_error {
        ("!", "bg-red-800 border-red-500")
    } else {
        ("✓", "bg-emerald-800 border-emerald-500")
    };
    let dismiss = move |_| {
        let slot = if is_error { state.error } else { state.success };
        slot.set(None);
    };

    view! {
        <button
            type="button"
            on:click=dismiss
            class=format!("flex items-center gap-3 border-l-4 {} px-4 py-3 rounded shadow-lg text-left", tone)
        >
            <span class="font-bold">{mark}</span>
            <span class="text-sm">{text}</span>
        </button>
    }
}
