//! `/settings`: backend and identity provider URLs, and a manual access
//! token, all kept in local storage.

use leptos::*;

use crate::api;
use crate::state::use_global;

#[component]
pub fn Settings() -> impl IntoView {
    view! {
        <div class="max-w-2xl mx-auto space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Preferences"</h1>
                <p class="text-stone-400 mt-1">"Where Smokering finds its backend"</p>
            </div>

            <BackendSettings />
            <SignInSettings />
            <About />
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Check {
    Untested,
    Checking,
    Reachable,
    Unreachable,
}

/// Backend URL with a health check
#[component]
fn BackendSettings() -> impl IntoView {
    let state = use_global();
    let url = create_rw_signal(api::get_api_base());
    let check = create_rw_signal(Check::Untested);

    let run_check = move |_| {
        api::set_api_base(&url.get_untracked());
        check.set(Check::Checking);
        spawn_local(async move {
            let result = api::check_health().await;
            state.online.set(result.is_ok());
            match result {
                Ok(health) => {
                    check.set(Check::Reachable);
                    state.show_success(&format!("Backend is {}", health.status));
                }
                Err(e) => {
                    check.set(Check::Unreachable);
                    state.show_error(&format!("Backend unreachable: {}", e));
                }
            }
        });
    };

    let save = move |_| {
        api::set_api_base(url.get_untracked().trim());
        state.show_success("API URL saved");
    };

    view! {
        <section class="bg-stone-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Backend"</h2>
            <label class="block space-y-1">
                <span class="text-sm text-stone-400">"REST API root"</span>
                <input
                    type="url"
                    prop:value=move || url.get()
                    on:input=move |ev| url.set(event_target_value(&ev))
                    class="w-full bg-stone-700 rounded-lg px-4 py-3 border border-stone-600
                           focus:border-amber-500 focus:outline-none"
                />
            </label>
            <div class="flex items-center gap-2">
                <span class="flex-1 text-sm">
                    {move || match check.get() {
                        Check::Untested => view! { <span class="text-stone-500">"Not checked"</span> },
                        Check::Checking => view! { <span class="text-stone-300">"Checking..."</span> },
                        Check::Reachable => view! { <span class="text-green-400">"✓ Reachable"</span> },
                        Check::Unreachable => view! { <span class="text-red-400">"✕ Unreachable"</span> },
                    }}
                </span>
                <button
                    on:click=run_check
                    disabled=move || check.get() == Check::Checking
                    class="px-4 py-2 bg-stone-600 hover:bg-stone-500 disabled:opacity-50 rounded-lg"
                >
                    "Check"
                </button>
                <button on:click=save class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">
                    "Save"
                </button>
            </div>
        </section>
    }
}

/// Identity provider and token settings
#[component]
fn SignInSettings() -> impl IntoView {
    let state = use_global();

    let (issuer, set_issuer) = create_signal(api::get_issuer());
    let (token, set_token) = create_signal(api::get_token().unwrap_or_default());

    let save = move |_| {
        api::set_issuer(&issuer.get_untracked());
        let t = token.get_untracked();
        api::set_token(Some(t.trim()).filter(|t| !t.is_empty()));
        state.load_session();
        state.show_success("Sign-in settings saved");
    };

    view! {
        <section class="bg-stone-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Sign-in"</h2>

            <label class="block space-y-1">
                <span class="text-sm text-stone-400">"Identity provider URL"</span>
                <input
                    type="text"
                    prop:value=move || issuer.get()
                    on:input=move |ev| set_issuer.set(event_target_value(&ev))
                    class="w-full bg-stone-700 rounded-lg px-4 py-3 border border-stone-600"
                />
            </label>

            <label class="block space-y-1">
                <span class="text-sm text-stone-400">"Access token (optional, overrides the session)"</span>
                <input
                    type="password"
                    prop:value=move || token.get()
                    on:input=move |ev| set_token.set(event_target_value(&ev))
                    class="w-full bg-stone-700 rounded-lg px-4 py-3 border border-stone-600"
                />
            </label>

            <div class="flex items-center justify-between">
                <span class="text-sm text-stone-400">
                    {move || match state.session.get() {
                        Some(s) => format!(
                            "Session for {} until {}",
                            s.user.name.unwrap_or_else(|| "unknown".to_string()),
                            s.expires.format("%H:%M")
                        ),
                        None => "No provider session".to_string(),
                    }}
                </span>
                <button on:click=save class="px-4 py-2 bg-amber-700 hover:bg-amber-600 rounded-lg">
                    "Save"
                </button>
            </div>
        </section>
    }
}

#[component]
fn About() -> impl IntoView {
    view! {
        <section class="bg-stone-800 rounded-xl p-6 text-sm text-stone-400 space-y-1">
            <h2 class="text-xl font-semibold text-white mb-2">"About"</h2>
            <p>{format!("Smokering web v{}", env!("CARGO_PKG_VERSION"))}</p>
            <p>"For local development run the stand-in backend: cargo run --bin smokering-mock"</p>
        </section>
    }
}
