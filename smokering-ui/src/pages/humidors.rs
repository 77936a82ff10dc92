//! Humidors Page
//!
//! The signed-in user's humidors and a form to add one.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::ListSkeleton;
use crate::state::use_global;

#[component]
pub fn Humidors() -> impl IntoView {
    let state = use_global();
    let (version, set_version) = create_signal(0u32);
    let humidors = create_local_resource(move || version.get(), |_| api::fetch_humidors());

    let (name, set_name) = create_signal(String::new());
    let (humidity, set_humidity) = create_signal(String::from("69"));

    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = name.get_untracked();
        if title.trim().is_empty() {
            state.show_error("Give the humidor a name");
            return;
        }
        let target = humidity.get_untracked().trim().parse::<u8>().ok();
        spawn_local(async move {
            match api::create_humidor(title.trim(), target).await {
                Ok(h) => {
                    state.show_success(&format!("Created {}", h.name));
                    set_name.set(String::new());
                    set_version.update(|v| *v += 1);
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">"Humidors"</h1>

            <Show
                when=move || state.signed_in()
                fallback=|| view! {
                    <p class="text-stone-400">"Sign in to manage your humidors."</p>
                }
            >
                <Suspense fallback=|| view! { <ListSkeleton count=2 /> }>
                    {move || humidors.get().map(|result| match result {
                        Ok(list) if list.is_empty() => view! {
                            <p class="text-stone-400">"No humidors yet."</p>
                        }.into_view(),
                        Ok(list) => view! {
                            <div class="grid md:grid-cols-2 gap-4">
                                {list.into_iter().map(|h| view! {
                                    <A href=format!("/humidors/{}", h.id)
                                        class="block bg-stone-800 hover:bg-stone-700 rounded-xl p-5 transition-colors">
                                        <div class="text-lg font-semibold text-amber-100">{h.name.clone()}</div>
                                        <div class="text-sm text-stone-400">
                                            {format!("{} cigars", h.cigar_count)}
                                            {h.target_humidity.map(|t| format!(" · {}% RH", t))}
                                        </div>
                                        {h.description.clone().map(|d| view! {
                                            <p class="text-sm text-stone-300 mt-2">{d}</p>
                                        })}
                                    </A>
                                }).collect_view()}
                            </div>
                        }.into_view(),
                        Err(e) => view! { <p class="text-red-400">{e}</p> }.into_view(),
                    })}
                </Suspense>

                <form on:submit=create class="bg-stone-800 rounded-xl p-5 flex space-x-2">
                    <input
                        type="text"
                        placeholder="New humidor name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        class="flex-1 bg-stone-700 rounded-lg px-4 py-2 border border-stone-600"
                    />
                    <input
                        type="number"
                        min="50"
                        max="85"
                        prop:value=move || humidity.get()
                        on:input=move |ev| set_humidity.set(event_target_value(&ev))
                        class="w-20 bg-stone-700 rounded-lg px-3 py-2 border border-stone-600"
                    />
                    <button type="submit" class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">
                        "Add"
                    </button>
                </form>
            </Show>
        </div>
    }
}
