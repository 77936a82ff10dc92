//! Humidor Detail Page
//!
//! Inventory of one humidor: add, remove and browse cigars.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::Loading;
use crate::models::Cigar;
use crate::state::use_global;

#[component]
pub fn HumidorDetail() -> impl IntoView {
    let state = use_global();
    let params = use_params_map();
    let id = move || params.with(|p| p.get("id").cloned().unwrap_or_default());
    let navigate = use_navigate();

    let humidor = create_local_resource(id, |id| async move { api::fetch_humidor(&id).await });
    let cigars = create_rw_signal(Vec::<Cigar>::new());
    create_effect(move |_| {
        let id = id();
        spawn_local(async move {
            match api::fetch_cigars(&id).await {
                Ok(list) => cigars.set(list),
                Err(e) => state.show_error(&e),
            }
        });
    });

    let (brand, set_brand) = create_signal(String::new());
    let (name, set_name) = create_signal(String::new());
    let (vitola, set_vitola) = create_signal(String::new());
    let (quantity, set_quantity) = create_signal(String::from("1"));

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (b, n) = (brand.get_untracked(), name.get_untracked());
        if b.trim().is_empty() || n.trim().is_empty() {
            state.show_error("Brand and name are required");
            return;
        }
        let v = Some(vitola.get_untracked()).filter(|v| !v.trim().is_empty());
        let qty = quantity.get_untracked().trim().parse::<u32>().unwrap_or(1).max(1);
        let humidor_id = id();
        spawn_local(async move {
            match api::add_cigar(&humidor_id, b.trim(), n.trim(), v, qty).await {
                Ok(cigar) => {
                    cigars.update(|c| c.push(cigar));
                    set_brand.set(String::new());
                    set_name.set(String::new());
                    set_vitola.set(String::new());
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let remove = move |cigar_id: String| {
        spawn_local(async move {
            match api::delete_cigar(&cigar_id).await {
                Ok(()) => cigars.update(|c| c.retain(|x| x.id != cigar_id)),
                Err(e) => state.show_error(&e),
            }
        });
    };

    let delete_humidor = move |_| {
        let humidor_id = id();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::delete_humidor(&humidor_id).await {
                Ok(()) => {
                    state.show_success("Humidor deleted");
                    navigate("/humidors", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let total = move || cigars.with(|c| c.iter().map(|x| x.quantity).sum::<u32>());

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <A href="/humidors" class="text-sm text-stone-400 hover:text-white">"← All humidors"</A>

            <Suspense fallback=|| view! { <Loading /> }>
                {move || humidor.get().map(|result| match result {
                    Ok(h) => view! {
                        <div class="flex items-start justify-between">
                            <div>
                                <h1 class="text-3xl font-bold">{h.name.clone()}</h1>
                                <p class="text-stone-400">
                                    {move || format!("{} cigars", total())}
                                    {h.target_humidity.map(|t| format!(" · target {}% RH", t))}
                                </p>
                            </div>
                            <button on:click=delete_humidor.clone()
                                class="text-sm text-stone-500 hover:text-red-400">"Delete humidor"</button>
                        </div>
                    }.into_view(),
                    Err(e) => view! { <p class="text-red-400">{e}</p> }.into_view(),
                })}
            </Suspense>

            <table class="w-full text-left bg-stone-800 rounded-xl overflow-hidden">
                <thead class="text-xs uppercase text-stone-400 bg-stone-900">
                    <tr>
                        <th class="px-4 py-2">"Cigar"</th>
                        <th class="px-4 py-2">"Strength"</th>
                        <th class="px-4 py-2 text-right">"Qty"</th>
                        <th class="px-4 py-2"></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || cigars.get()
                        key=|c| (c.id.clone(), c.quantity)
                        children=move |cigar| {
                            let cigar_id = cigar.id.clone();
                            view! {
                                <tr class="border-t border-stone-700">
                                    <td class="px-4 py-2">
                                        <div class="text-amber-100">{format!("{} {}", cigar.brand, cigar.name)}</div>
                                        <div class="text-xs text-stone-400">{cigar.vitola.clone().unwrap_or_default()}</div>
                                    </td>
                                    <td class="px-4 py-2 text-sm">{cigar.strength.clone().unwrap_or_else(|| "-".to_string())}</td>
                                    <td class="px-4 py-2 text-right">{cigar.quantity}</td>
                                    <td class="px-4 py-2 text-right">
                                        <button on:click=move |_| remove(cigar_id.clone())
                                            class="text-xs text-stone-500 hover:text-red-400">"Remove"</button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <form on:submit=add class="bg-stone-800 rounded-xl p-5 grid grid-cols-2 md:grid-cols-5 gap-2">
                <input type="text" placeholder="Brand" prop:value=move || brand.get()
                    on:input=move |ev| set_brand.set(event_target_value(&ev))
                    class="bg-stone-700 rounded-lg px-3 py-2 border border-stone-600" />
                <input type="text" placeholder="Name" prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    class="bg-stone-700 rounded-lg px-3 py-2 border border-stone-600" />
                <input type="text" placeholder="Vitola" prop:value=move || vitola.get()
                    on:input=move |ev| set_vitola.set(event_target_value(&ev))
                    class="bg-stone-700 rounded-lg px-3 py-2 border border-stone-600" />
                <input type="number" min="1" prop:value=move || quantity.get()
                    on:input=move |ev| set_quantity.set(event_target_value(&ev))
                    class="bg-stone-700 rounded-lg px-3 py-2 border border-stone-600" />
                <button type="submit" class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">"Add cigar"</button>
            </form>
        </div>
    }
}
