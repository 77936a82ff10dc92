//! Profile Pages
//!
//! The signed-in user's profile and other users' public profiles.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::Loading;
use crate::models::User;
use crate::state::use_global;

/// `/profile`
#[component]
pub fn MyProfile() -> impl IntoView {
    let state = use_global();
    let profile = create_local_resource(|| (), |_| api::fetch_profile());

    let sign_out = move |_| {
        state.sign_out();
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(&api::sign_out_url());
        }
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <Suspense fallback=|| view! { <Loading /> }>
                {move || profile.get().map(|result| match result {
                    Ok(user) => view! {
                        <ProfileCard user=user />
                        <button on:click=sign_out class="px-4 py-2 bg-stone-700 hover:bg-stone-600 rounded-lg">
                            "Sign out"
                        </button>
                    }.into_view(),
                    Err(e) => view! {
                        <div class="text-center space-y-4 py-8">
                            <p class="text-stone-400">{e}</p>
                            <a href=api::sign_in_url() class="px-4 py-2 bg-amber-700 rounded-lg">"Sign in"</a>
                        </div>
                    }.into_view(),
                })}
            </Suspense>
        </div>
    }
}

/// `/users/:id`
#[component]
pub fn UserProfile() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.with(|p| p.get("id").cloned().unwrap_or_default());
    let user = create_local_resource(id, |id| async move { api::fetch_user(&id).await });

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <Suspense fallback=|| view! { <Loading /> }>
                {move || user.get().map(|result| match result {
                    Ok(user) => view! { <ProfileCard user=user /> }.into_view(),
                    Err(e) => view! { <p class="text-red-400 text-center py-8">{e}</p> }.into_view(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn ProfileCard(user: User) -> impl IntoView {
    let name = user.display_name.clone().unwrap_or_else(|| user.username.clone());

    view! {
        <section class="bg-stone-800 rounded-xl p-6 space-y-4">
            <div class="flex items-center space-x-4">
                {match user.avatar_url.clone() {
                    Some(url) => view! { <img src=api::media_url(&url) class="w-16 h-16 rounded-full" /> }.into_view(),
                    None => view! {
                        <div class="w-16 h-16 rounded-full bg-amber-800 flex items-center justify-center text-2xl">
                            {name.chars().next().unwrap_or('?').to_string()}
                        </div>
                    }.into_view(),
                }}
                <div>
                    <h1 class="text-2xl font-bold">{name.clone()}</h1>
                    <p class="text-stone-400">{format!("@{}", user.username)}</p>
                </div>
            </div>

            {user.bio.clone().map(|b| view! { <p class="text-stone-200">{b}</p> })}
            {user.location.clone().map(|l| view! { <p class="text-sm text-stone-400">{format!("📍 {}", l)}</p> })}

            <div class="grid grid-cols-3 text-center">
                <Stat label="Posts" value=user.post_count />
                <Stat label="Followers" value=user.follower_count />
                <Stat label="Following" value=user.following_count />
            </div>

            <div class="flex justify-between text-sm text-stone-400">
                <span>{format!("Joined {}", user.joined_at.format("%B %Y"))}</span>
                <A href=format!("/reviews?author={}", user.id) class="hover:text-white">"Reviews →"</A>
            </div>
        </section>
    }
}

#[component]
fn Stat(label: &'static str, value: u32) -> impl IntoView {
    view! {
        <div>
            <div class="text-2xl font-bold text-amber-100">{value}</div>
            <div class="text-xs uppercase text-stone-400">{label}</div>
        </div>
    }
}
