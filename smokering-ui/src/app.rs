//! App Root Component
//!
//! Routing plus the global and feed providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::pages::{
    Feed, HumidorDetail, Humidors, MyProfile, PostDetail, ReviewWizard, Reviews, Settings,
    UserProfile,
};
use crate::state::{provide_feed_store, provide_global_state, use_global};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    provide_feed_store();

    let state = use_global();
    state.load_session();

    view! {
        <Router>
            <div class="min-h-screen bg-stone-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8 pb-16">
                    <Routes>
                        <Route path="/" view=Feed />
                        <Route path="/posts/:id" view=PostDetail />
                        <Route path="/humidors" view=Humidors />
                        <Route path="/humidors/:id" view=HumidorDetail />
                        <Route path="/reviews" view=Reviews />
                        <Route path="/reviews/new" view=ReviewWizard />
                        <Route path="/profile" view=MyProfile />
                        <Route path="/users/:id" view=UserProfile />
                        <Route path="/settings" view=Settings />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <OfflineBanner />
                <Toast />
            </div>
        </Router>
    }
}

/// Shown after a failed health check in settings
#[component]
fn OfflineBanner() -> impl IntoView {
    let state = use_global();

    view! {
        <Show when=move || !state.online.get()>
            <div class="fixed bottom-0 left-0 right-0 bg-red-900 text-red-100 text-sm text-center py-2">
                "Backend unreachable. Check the API URL in "
                <A href="/settings" class="underline">"Settings"</A>
            </div>
        </Show>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🍂"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-stone-400 mb-6">"Nothing smoldering here."</p>
            <A href="/" class="px-6 py-3 bg-amber-700 hover:bg-amber-600 rounded-lg font-medium">
                "Back to the feed"
            </A>
        </div>
    }
}
