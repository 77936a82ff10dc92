//! Review Wizard Page
//!
//! Multi-step review form. Exactly one step is shown; Next validates the
//! current step, and the step bar jumps back to any step already visited.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ImageUpload, StopwatchPanel};
use crate::state::wizard::{format_elapsed, Stopwatch, WizardDraft, WizardStep};
use crate::state::use_global;

#[component]
pub fn ReviewWizard() -> impl IntoView {
    let state = use_global();
    let navigate = use_navigate();

    let step = create_rw_signal(WizardStep::Cigar);
    let furthest = create_rw_signal(WizardStep::Cigar);
    let draft = create_rw_signal(WizardDraft::default());
    let watch = create_rw_signal(Stopwatch::default());
    let (submitting, set_submitting) = create_signal(false);

    let next = move |_| {
        let current = step.get_untracked();
        if let Some(problem) = draft.with_untracked(|d| d.problem(current)) {
            state.show_error(&problem);
            return;
        }
        if let Some(following) = current.next() {
            step.set(following);
            furthest.update(|f| *f = (*f).max(following));
        }
    };

    let back = move |_| {
        if let Some(previous) = step.get_untracked().previous() {
            step.set(previous);
        }
    };

    let submit = move |_| {
        if let Some(problem) = draft.with_untracked(|d| d.problem(WizardStep::Summary)) {
            state.show_error(&problem);
            return;
        }
        let now = js_sys::Date::now();
        watch.update(|w| w.pause(now));
        let review = draft.with_untracked(|d| d.to_review(watch.get_untracked().elapsed_secs(now)));

        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::create_review(&review).await {
                Ok(saved) => {
                    state.show_success(&format!("Reviewed {}", saved.cigar_name));
                    navigate("/reviews", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">"New review"</h1>

            <ol class="flex space-x-2 text-sm">
                {WizardStep::ALL.into_iter().map(|s| view! {
                    <li>
                        <button
                            type="button"
                            disabled=move || s > furthest.get()
                            on:click=move |_| step.set(s)
                            class=move || {
                                if step.get() == s {
                                    "px-3 py-1 rounded-full bg-amber-700 text-white"
                                } else if s <= furthest.get() {
                                    "px-3 py-1 rounded-full bg-stone-700 text-stone-200"
                                } else {
                                    "px-3 py-1 rounded-full bg-stone-800 text-stone-500"
                                }
                            }
                        >
                            {format!("{}. {}", s.index() + 1, s.title())}
                        </button>
                    </li>
                }).collect_view()}
            </ol>

            <section class="bg-stone-800 rounded-xl p-6 space-y-4">
                {move || match step.get() {
                    WizardStep::Cigar => view! { <CigarStep draft=draft /> }.into_view(),
                    WizardStep::Smoke => view! { <SmokeStep draft=draft watch=watch /> }.into_view(),
                    WizardStep::Tasting => view! { <TastingStep draft=draft /> }.into_view(),
                    WizardStep::Verdict => view! { <VerdictStep draft=draft /> }.into_view(),
                    WizardStep::Summary => view! { <SummaryStep draft=draft watch=watch /> }.into_view(),
                }}
            </section>

            <div class="flex justify-between">
                <button
                    type="button"
                    on:click=back
                    disabled=move || step.get() == WizardStep::Cigar
                    class="px-4 py-2 bg-stone-700 disabled:opacity-40 rounded-lg"
                >
                    "Back"
                </button>
                {move || if step.get() == WizardStep::Summary {
                    view! {
                        <button
                            type="button"
                            on:click=submit.clone()
                            disabled=move || submitting.get()
                            class="px-5 py-2 bg-amber-700 hover:bg-amber-600 disabled:bg-stone-600 rounded-lg font-medium"
                        >
                            {move || if submitting.get() { "Saving..." } else { "Publish review" }}
                        </button>
                    }.into_view()
                } else {
                    view! {
                        <button type="button" on:click=next
                            class="px-5 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg font-medium">
                            "Next"
                        </button>
                    }.into_view()
                }}
            </div>
        </div>
    }
}

fn field_class() -> &'static str {
    "w-full bg-stone-700 rounded-lg px-4 py-2 border border-stone-600 focus:border-amber-500 focus:outline-none"
}

#[component]
fn TextField(
    label: &'static str,
    draft: RwSignal<WizardDraft>,
    get: fn(&WizardDraft) -> String,
    set: fn(&mut WizardDraft, String),
) -> impl IntoView {
    view! {
        <label class="block space-y-1">
            <span class="text-sm text-stone-400">{label}</span>
            <input
                type="text"
                prop:value=move || draft.with(get)
                on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                class=field_class()
            />
        </label>
    }
}

/// 1-5 picker for draw, burn and construction
#[component]
fn DetailRating(
    label: &'static str,
    draft: RwSignal<WizardDraft>,
    get: fn(&WizardDraft) -> Option<u8>,
    set: fn(&mut WizardDraft, Option<u8>),
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between">
            <span class="text-sm text-stone-300">{label}</span>
            <div class="flex space-x-1">
                {(1..=5u8).map(|v| view! {
                    <button
                        type="button"
                        on:click=move |_| draft.update(|d| {
                            let value = if get(d) == Some(v) { None } else { Some(v) };
                            set(d, value)
                        })
                        class=move || if draft.with(get).map_or(false, |r| r >= v) {
                            "w-8 h-8 rounded-full bg-amber-600"
                        } else {
                            "w-8 h-8 rounded-full bg-stone-700"
                        }
                    >
                        {v}
                    </button>
                }).collect_view()}
            </div>
        </div>
    }
}

#[component]
fn CigarStep(draft: RwSignal<WizardDraft>) -> impl IntoView {
    view! {
        <TextField label="Cigar" draft=draft
            get=|d| d.cigar_name.clone() set=|d, v| d.cigar_name = v />
        <TextField label="Vitola" draft=draft
            get=|d| d.vitola.clone() set=|d, v| d.vitola = v />
        <ImageUpload on_uploaded=move |url| draft.update(|d| d.image_url = url) />
    }
}

#[component]
fn SmokeStep(draft: RwSignal<WizardDraft>, watch: RwSignal<Stopwatch>) -> impl IntoView {
    view! {
        <StopwatchPanel watch=watch />
        <DetailRating label="Draw" draft=draft
            get=|d| d.draw_rating set=|d, v| d.draw_rating = v />
        <DetailRating label="Burn" draft=draft
            get=|d| d.burn_rating set=|d, v| d.burn_rating = v />
        <DetailRating label="Construction" draft=draft
            get=|d| d.construction_rating set=|d, v| d.construction_rating = v />
    }
}

#[component]
fn TastingStep(draft: RwSignal<WizardDraft>) -> impl IntoView {
    view! {
        <p class="text-sm text-stone-400">"Comma-separated notes for each third."</p>
        <TextField label="First third" draft=draft
            get=|d| d.first_third.clone() set=|d, v| d.first_third = v />
        <TextField label="Second third" draft=draft
            get=|d| d.second_third.clone() set=|d, v| d.second_third = v />
        <TextField label="Final third" draft=draft
            get=|d| d.final_third.clone() set=|d, v| d.final_third = v />
    }
}

#[component]
fn VerdictStep(draft: RwSignal<WizardDraft>) -> impl IntoView {
    view! {
        <label class="block space-y-1">
            <span class="text-sm text-stone-400">"Overall score (0-100)"</span>
            <input
                type="number"
                min="0"
                max="100"
                prop:value=move || draft.with(|d| d.rating.map(|r| r.to_string()).unwrap_or_default())
                on:input=move |ev| {
                    let rating = event_target_value(&ev).trim().parse::<u8>().ok();
                    draft.update(|d| d.rating = rating);
                }
                class=field_class()
            />
        </label>
        <label class="block space-y-1">
            <span class="text-sm text-stone-400">"Notes"</span>
            <textarea
                rows=5
                prop:value=move || draft.with(|d| d.notes.clone())
                on:input=move |ev| draft.update(|d| d.notes = event_target_value(&ev))
                class=field_class()
            />
        </label>
    }
}

#[component]
fn SummaryStep(draft: RwSignal<WizardDraft>, watch: RwSignal<Stopwatch>) -> impl IntoView {
    let d = draft.get_untracked();
    let smoke = format_elapsed(watch.get_untracked().elapsed_secs(js_sys::Date::now()));
    let stars = |v: Option<u8>| v.map(|v| format!("{}/5", v)).unwrap_or_else(|| "-".to_string());

    view! {
        <dl class="grid grid-cols-2 gap-y-2 text-sm">
            <dt class="text-stone-400">"Cigar"</dt><dd>{d.cigar_name.clone()}</dd>
            <dt class="text-stone-400">"Vitola"</dt><dd>{d.vitola.clone()}</dd>
            <dt class="text-stone-400">"Smoke time"</dt><dd>{smoke}</dd>
            <dt class="text-stone-400">"Draw"</dt><dd>{stars(d.draw_rating)}</dd>
            <dt class="text-stone-400">"Burn"</dt><dd>{stars(d.burn_rating)}</dd>
            <dt class="text-stone-400">"Construction"</dt><dd>{stars(d.construction_rating)}</dd>
            <dt class="text-stone-400">"Flavors"</dt>
            <dd>{[d.first_third.as_str(), d.second_third.as_str(), d.final_third.as_str()]
                .iter()
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" / ")}</dd>
            <dt class="text-stone-400">"Score"</dt>
            <dd class="text-2xl font-bold text-amber-400">{d.rating.map(|r| r.to_string()).unwrap_or_default()}</dd>
        </dl>
        {(!d.notes.trim().is_empty()).then(|| view! { <p class="text-stone-200">{d.notes.clone()}</p> })}
    }
}
