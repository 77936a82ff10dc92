//! Image Upload
//!
//! File picker that uploads straight away and reports the hosted URL.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::api;
use crate::state::use_global;

/// Largest image accepted by the backend
const MAX_UPLOAD_BYTES: f64 = 10.0 * 1024.0 * 1024.0;

#[component]
pub fn ImageUpload(
    /// Receives the uploaded image URL, or `None` once removed
    #[prop(into)]
    on_uploaded: Callback<Option<String>>,
) -> impl IntoView {
    let state = use_global();
    let (uploading, set_uploading) = create_signal(false);
    let (preview, set_preview) = create_signal(None::<String>);

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        if !file.type_().starts_with("image/") {
            state.show_error("Only images can be attached");
            return;
        }
        if file.size() > MAX_UPLOAD_BYTES {
            state.show_error("Images are limited to 10 MB");
            return;
        }

        set_uploading.set(true);
        spawn_local(async move {
            match api::upload_image(file).await {
                Ok(url) => {
                    set_preview.set(Some(api::media_url(&url)));
                    on_uploaded.call(Some(url));
                }
                Err(e) => state.show_error(&e),
            }
            set_uploading.set(false);
        });
    };

    let clear = move |_| {
        set_preview.set(None);
        on_uploaded.call(None);
    };

    view! {
        <div class="space-y-2">
            {move || match preview.get() {
                Some(src) => view! {
                    <div class="relative inline-block">
                        <img src=src class="rounded-lg max-h-40" />
                        <button
                            type="button"
                            on:click=clear
                            class="absolute top-1 right-1 bg-stone-900/80 rounded-full w-6 h-6 text-xs"
                        >
                            "✕"
                        </button>
                    </div>
                }.into_view(),
                None => view! {
                    <label class="inline-flex items-center space-x-2 cursor-pointer text-sm text-stone-400 hover:text-white">
                        <span>"📷 Add photo"</span>
                        <input type="file" accept="image/*" class="hidden" on:change=on_change />
                        <Show when=move || uploading.get()>
                            <span class="inline-block loading-spinner w-4 h-4" />
                        </Show>
                    </label>
                }.into_view(),
            }}
        </div>
    }
}
