//! Reviews Page
//!
//! Paged review listing, optionally limited to one author via `?author=`.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::ListSkeleton;
use crate::models::Review;
use crate::state::{use_global, wizard::format_elapsed};

#[component]
pub fn Reviews() -> impl IntoView {
    let state = use_global();
    let query = use_query_map();
    let author = move || query.with(|q| q.get("author").cloned());
    let (page, set_page) = create_signal(1u32);

    let reviews = create_local_resource(
        move || (author(), page.get()),
        |(author, page)| async move { api::fetch_reviews(author.as_deref(), page).await },
    );

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Reviews"</h1>
                <Show when=move || state.signed_in()>
                    <A href="/reviews/new" class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg font-medium">
                        "Write a review"
                    </A>
                </Show>
            </div>

            <Transition fallback=|| view! { <ListSkeleton count=3 /> }>
                {move || reviews.get().map(|result| match result {
                    Ok(listing) => {
                        let has_more = listing.has_more;
                        view! {
                            <div class="space-y-4">
                                {listing.data.into_iter().map(|r| view! { <ReviewCard review=r /> }).collect_view()}
                            </div>
                            <div class="flex justify-between">
                                <button
                                    disabled=move || page.get() <= 1
                                    on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1).max(1))
                                    class="px-4 py-2 bg-stone-700 disabled:opacity-40 rounded-lg"
                                >
                                    "Newer"
                                </button>
                                <button
                                    disabled=!has_more
                                    on:click=move |_| set_page.update(|p| *p += 1)
                                    class="px-4 py-2 bg-stone-700 disabled:opacity-40 rounded-lg"
                                >
                                    "Older"
                                </button>
                            </div>
                        }.into_view()
                    }
                    Err(e) => view! { <p class="text-red-400">{e}</p> }.into_view(),
                })}
            </Transition>
        </div>
    }
}

#[component]
fn ReviewCard(review: Review) -> impl IntoView {
    let details: Vec<String> = [
        ("Draw", review.draw_rating),
        ("Burn", review.burn_rating),
        ("Construction", review.construction_rating),
    ]
    .iter()
    .filter_map(|(label, v)| v.map(|v| format!("{} {}/5", label, v)))
    .collect();

    let notes = &review.flavor_notes;
    let flavors: Vec<String> = notes
        .first_third
        .iter()
        .chain(&notes.second_third)
        .chain(&notes.final_third)
        .fold(Vec::new(), |mut seen, note| {
            if !seen.contains(note) {
                seen.push(note.clone());
            }
            seen
        });

    view! {
        <article class="bg-stone-800 rounded-xl p-5 space-y-2">
            <div class="flex items-start justify-between">
                <div>
                    <h2 class="text-lg font-semibold text-amber-100">{review.cigar_name.clone()}</h2>
                    <p class="text-sm text-stone-400">
                        {review.vitola.clone().unwrap_or_default()}
                        " · by "
                        <A href=format!("/users/{}", review.author.id)>{review.author.shown_name()}</A>
                        {format!(" · {}", review.created_at.format("%b %e, %Y"))}
                    </p>
                </div>
                <div class="text-3xl font-bold text-amber-400">{review.rating}</div>
            </div>
            {(!details.is_empty()).then(|| view! {
                <p class="text-sm text-stone-300">{details.join(" · ")}</p>
            })}
            {(!flavors.is_empty()).then(|| view! {
                <div class="flex flex-wrap gap-1">
                    {flavors.into_iter().map(|f| view! {
                        <span class="text-xs px-2 py-1 rounded-full bg-stone-700">{f}</span>
                    }).collect_view()}
                </div>
            })}
            {review.smoke_duration_secs.map(|s| view! {
                <p class="text-xs text-stone-400">{format!("Smoke time {}", format_elapsed(s))}</p>
            })}
            {review.notes.clone().map(|n| view! { <p class="text-stone-200">{n}</p> })}
        </article>
    }
}
