//! Header bar: brand, section links and the sign-in state.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::use_global;

#[component]
pub fn Nav() -> impl IntoView {
    let state = use_global();

    view! {
        <nav class="bg-stone-800 border-b border-stone-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🚬"</span>
                        <span class="text-xl font-bold text-amber-100">"Smokering"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/" label="Feed" />
                        <NavLink href="/humidors" label="Humidors" />
                        <NavLink href="/reviews" label="Reviews" />
                        <NavLink href="/settings" label="Settings" />

                        {move || match state.me.get() {
                            Some(user) => view! {
                                <A
                                    href="/profile"
                                    class="ml-2 px-3 py-2 rounded-lg bg-stone-700 text-amber-100"
                                >
                                    {format!("@{}", user.username)}
                                </A>
                            }.into_view(),
                            None => view! {
                                <a
                                    href=api::sign_in_url()
                                    class="ml-2 px-3 py-2 rounded-lg bg-amber-700 hover:bg-amber-600 text-white"
                                >
                                    "Sign in"
                                </a>
                            }.into_view(),
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Highlighted while its route is current
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="px-4 py-2 rounded-lg text-stone-300 hover:text-white hover:bg-stone-700 transition-colors"
            active_class="bg-stone-700 text-white"
        >
            {label}
        </A>
    }
}
