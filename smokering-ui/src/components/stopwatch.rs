//! Stopwatch Panel
//!
//! Start, pause, resume and reset controls for the smoke timer.

use gloo_timers::callback::Interval;
use leptos::*;

use crate::state::wizard::{format_elapsed, Stopwatch, StopwatchState};

#[component]
pub fn StopwatchPanel(watch: RwSignal<Stopwatch>) -> impl IntoView {
    let now = create_rw_signal(js_sys::Date::now());

    // repaint once a second while mounted
    let ticker = store_value(Some(Interval::new(1000, move || now.set(js_sys::Date::now()))));
    on_cleanup(move || ticker.update_value(|t| {
        t.take();
    }));

    let act = move |f: fn(&mut Stopwatch, f64)| {
        let at = js_sys::Date::now();
        watch.update(|w| f(w, at));
        now.set(at);
    };

    view! {
        <div class="bg-stone-900 rounded-xl p-6 text-center space-y-4">
            <div class="text-5xl font-mono text-amber-100">
                {move || format_elapsed(watch.get().elapsed_secs(now.get()))}
            </div>
            <div class="flex justify-center space-x-2">
                {move || match watch.get().state {
                    StopwatchState::Idle => view! {
                        <button type="button" on:click=move |_| act(Stopwatch::start)
                            class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">"Light up"</button>
                    }.into_view(),
                    StopwatchState::Running => view! {
                        <button type="button" on:click=move |_| act(Stopwatch::pause)
                            class="px-4 py-2 bg-stone-600 hover:bg-stone-500 rounded-lg">"Pause"</button>
                    }.into_view(),
                    StopwatchState::Paused => view! {
                        <button type="button" on:click=move |_| act(Stopwatch::resume)
                            class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">"Resume"</button>
                    }.into_view(),
                }}
                <button type="button" on:click=move |_| watch.update(Stopwatch::reset)
                    class="px-4 py-2 bg-stone-700 hover:bg-stone-600 rounded-lg">"Reset"</button>
            </div>
        </div>
    }
}
