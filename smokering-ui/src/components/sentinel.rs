//! Infinite Scroll Sentinel
//!
//! An empty element at the end of a list. An `IntersectionObserver` reports
//! whenever it scrolls into or out of view.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Calls `on_visible(true)` when the sentinel enters the viewport
#[component]
pub fn Sentinel(
    #[prop(into)]
    on_visible: Callback<bool>,
) -> impl IntoView {
    let node = create_node_ref::<html::Div>();
    let observer = store_value(None::<(IntersectionObserver, Closure<dyn FnMut(js_sys::Array)>)>);

    node.on_load(move |el| {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let visible = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .any(|e| e.is_intersecting());
            on_visible.call(visible);
        });

        // start loading a little before the bottom is reached
        let mut options = IntersectionObserverInit::new();
        options.root_margin("200px");

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            // the closure must outlive the observer; both drop on cleanup
            Ok(obs) => {
                obs.observe(&el);
                observer.set_value(Some((obs, callback)));
            }
            Err(e) => web_sys::console::error_1(&e),
        }
    });

    on_cleanup(move || {
        observer.update_value(|slot| {
            if let Some((obs, _callback)) = slot.take() {
                obs.disconnect();
            }
        });
    });

    view! { <div node_ref=node class="h-4" aria-hidden="true" /> }
}
