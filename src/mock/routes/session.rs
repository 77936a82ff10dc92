//! Identity Provider Stand-in Routes
//!
//! Just enough of the provider for local development: a session lookup and
//! cookie-based sign in and out.
//!
//! - GET /api/auth/session - `{user, accessToken, expires}` or `{}`
//! - GET /api/auth/signin?callbackUrl=&as= - Sign in as a seeded user
//! - GET /api/auth/signout?callbackUrl= - Clear the session cookie

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::mock::error::{MockError, MockResult};
use crate::mock::state::{cookie, MockState, SESSION_COOKIE, SESSION_TTL_HOURS};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInQuery {
    pub callback_url: Option<String>,
    /// Username to sign in as; the first seeded user when absent
    #[serde(rename = "as")]
    pub as_user: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutQuery {
    pub callback_url: Option<String>,
}

/// GET /api/auth/session
pub async fn session(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    let store = state.store.read().await;
    let signed_in = cookie(&headers, SESSION_COOKIE).and_then(|token| {
        let user = store.sessions.get(token).and_then(|id| store.user(id).ok())?;
        Some((token, user))
    });

    let Some((token, user)) = signed_in else {
        return Json(json!({}));
    };

    Json(json!({
        "user": {
            "id": user.id,
            "name": user.display_name.clone().unwrap_or_else(|| user.username.clone()),
            "email": format!("{}@smokering.local", user.username),
            "image": user.avatar_url,
        },
        "accessToken": token,
        "expires": Utc::now() + Duration::hours(SESSION_TTL_HOURS),
    }))
}

/// GET /api/auth/signin
pub async fn sign_in(
    State(state): State<Arc<MockState>>,
    Query(query): Query<SignInQuery>,
) -> MockResult<Response> {
    let store = state.store.read().await;
    let user = match &query.as_user {
        Some(name) => store.users.iter().find(|u| u.username == *name || u.id == *name),
        None => store.users.first(),
    }
    .ok_or_else(|| MockError::NotFound("No such user to sign in as".to_string()))?;

    let token = store
        .sessions
        .iter()
        .find(|(_, id)| **id == user.id)
        .map(|(token, _)| token.clone())
        .ok_or_else(|| MockError::Internal(format!("User {} has no session token", user.id)))?;

    let cookie = HeaderValue::from_str(&format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token))
        .map_err(|e| MockError::Internal(e.to_string()))?;
    tracing::info!(user = %user.username, "Signed in");

    let target = query.callback_url.unwrap_or_else(|| "/".to_string());
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
}

/// GET /api/auth/signout
pub async fn sign_out(Query(query): Query<SignOutQuery>) -> Response {
    let cleared = format!("{}=; Path=/; Max-Age=0", SESSION_COOKIE);
    let target = query.callback_url.unwrap_or_else(|| "/".to_string());
    ([(header::SET_COOKIE, cleared)], Redirect::to(&target)).into_response()
}
