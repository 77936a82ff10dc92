//! App-wide signals: who is signed in, whether the backend answered, and
//! the toast messages.

use leptos::*;

use crate::api;
use crate::models::{Session, User};

#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Identity provider session, if signed in
    pub session: RwSignal<Option<Session>>,
    /// Profile of the signed-in user
    pub me: RwSignal<Option<User>>,
    /// Backend reachable on the last health check
    pub online: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub success: RwSignal<Option<String>>,
}

pub fn provide_global_state() {
    provide_context(GlobalState {
        session: create_rw_signal(None),
        me: create_rw_signal(None),
        online: create_rw_signal(true),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    });
}

pub fn use_global() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    pub fn signed_in(&self) -> bool {
        self.me.get().is_some()
    }

    /// Id of the signed-in user, if any
    pub fn my_id(&self) -> Option<String> {
        self.me.get().map(|u| u.id)
    }

    /// Pick up the provider session and the profile behind it
    pub fn load_session(self) {
        spawn_local(async move {
            match api::fetch_session().await {
                Ok(Some(session)) => {
                    api::set_token(Some(&session.access_token));
                    self.session.set(Some(session));
                }
                Ok(None) => self.session.set(None),
                Err(e) => {
                    web_sys::console::warn_1(&e.into());
                }
            }

            // a token pasted in settings works without a provider session
            if api::get_token().is_some() {
                match api::fetch_profile().await {
                    Ok(user) => self.me.set(Some(user)),
                    Err(_) => self.me.set(None),
                }
            }
        });
    }

    pub fn sign_out(self) {
        api::set_token(None);
        self.session.set(None);
        self.me.set(None);
    }

    pub fn show_success(&self, message: &str) {
        flash(self.success, message, 3_000);
    }

    /// Errors stay up longer than confirmations
    pub fn show_error(&self, message: &str) {
        flash(self.error, message, 6_000);
    }
}

/// Set `slot`, then clear it after `millis` unless a newer message replaced it
fn flash(slot: RwSignal<Option<String>>, message: &str, millis: u32) {
    let message = message.to_string();
    slot.set(Some(message.clone()));
    gloo_timers::callback::Timeout::new(millis, move || {
        if slot.get_untracked().as_deref() == Some(message.as_str()) {
            slot.set(None);
        }
    })
    .forget();
}
