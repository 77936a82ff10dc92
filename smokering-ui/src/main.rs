//! Smokering Web
//!
//! Browser front-end for the Smokering cigar community, built with Leptos
//! (CSR, WebAssembly). Talks to the REST API over HTTP and to the identity
//! provider for the session cookie.

use leptos::*;

mod api;
mod app;
mod components;
mod models;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
