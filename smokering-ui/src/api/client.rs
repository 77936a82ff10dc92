//! HTTP API Client
//!
//! Functions for communicating with the Smokering REST API and the identity
//! provider's session endpoint.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::RequestCredentials;

use crate::models::{
    Cigar, Comment, Envelope, Humidor, LikeStatus, NewReview, Page, Post, Review, Session,
    UploadedImage, User,
};

/// Default API base URL (the local stand-in backend)
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

/// Default identity provider; the stand-in backend serves its session routes
pub const DEFAULT_ISSUER: &str = "http://localhost:8090";

const API_URL_KEY: &str = "smokering_api_url";
const ISSUER_KEY: &str = "smokering_issuer_url";
const TOKEN_KEY: &str = "smokering_token";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn stored(key: &str) -> Option<String> {
    storage()?.get_item(key).ok().flatten().filter(|v| !v.is_empty())
}

fn store(key: &str, value: Option<&str>) {
    if let Some(storage) = storage() {
        let _ = match value {
            Some(v) => storage.set_item(key, v),
            None => storage.remove_item(key),
        };
    }
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    stored(API_URL_KEY)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    store(API_URL_KEY, Some(url.trim_end_matches('/')));
}

pub fn get_issuer() -> String {
    stored(ISSUER_KEY)
        .unwrap_or_else(|| DEFAULT_ISSUER.to_string())
        .trim_end_matches('/')
        .to_string()
}

pub fn set_issuer(url: &str) {
    store(ISSUER_KEY, Some(url.trim_end_matches('/')));
}

/// Bearer token used for API calls, if signed in
pub fn get_token() -> Option<String> {
    stored(TOKEN_KEY)
}

pub fn set_token(token: Option<&str>) {
    store(TOKEN_KEY, token);
}

/// Where to send the browser to sign in
pub fn sign_in_url() -> String {
    let here = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    format!(
        "{}/api/auth/signin?callbackUrl={}",
        get_issuer(),
        String::from(js_sys::encode_uri_component(&here))
    )
}

pub fn sign_out_url() -> String {
    format!("{}/api/auth/signout", get_issuer())
}

// ============ Request Plumbing ============

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

fn authed(builder: RequestBuilder) -> RequestBuilder {
    match get_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("Request failed with status {}", status),
    };
    Err(match status {
        401 => format!("Please sign in: {}", message),
        _ => message,
    })
}

async fn data<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    let envelope: Envelope<T> = check(response)
        .await?
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;
    Ok(envelope.data)
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = authed(Request::get(&url(path)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    data(response).await
}

async fn send_json<B: Serialize, T: DeserializeOwned>(
    builder: RequestBuilder,
    body: &B,
) -> Result<T, String> {
    let response = authed(builder)
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    data(response).await
}

async fn delete(path: &str) -> Result<(), String> {
    let response = authed(Request::delete(&url(path)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response).await.map(|_| ())
}

fn segment(id: &str) -> String {
    String::from(js_sys::encode_uri_component(id))
}

// ============ Session ============

/// Current identity provider session, `None` when signed out
pub async fn fetch_session() -> Result<Option<Session>, String> {
    let response = Request::get(&format!("{}/api/auth/session", get_issuer()))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| format!("Identity provider unreachable: {}", e))?;
    if !response.ok() {
        return Err(format!("Identity provider error {}", response.status()));
    }

    // a signed-out session is an empty object
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;
    if body.get("accessToken").is_none() {
        return Ok(None);
    }
    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| format!("Parse error: {}", e))
}

// ============ Feed & Posts ============

pub async fn fetch_feed(sort: &str, filter: &str, page: u32, limit: u32) -> Result<Page<Post>, String> {
    let response = authed(Request::get(&url("/feed")))
        .query([
            ("sort", sort.to_string()),
            ("filter", filter.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ])
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// The single newest post for a filter
pub async fn fetch_latest(filter: &str) -> Result<Option<Post>, String> {
    get(&format!("/feed/latest?filter={}", filter)).await
}

pub async fn create_post(body: &str, image_url: Option<String>) -> Result<Post, String> {
    #[derive(Serialize)]
    struct NewPost<'a> {
        body: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    }
    send_json(Request::post(&url("/posts")), &NewPost { body, image_url }).await
}

pub async fn fetch_post(id: &str) -> Result<Post, String> {
    get(&format!("/posts/{}", segment(id))).await
}

pub async fn delete_post(id: &str) -> Result<(), String> {
    delete(&format!("/posts/{}", segment(id))).await
}

pub async fn fetch_comments(post_id: &str) -> Result<Vec<Comment>, String> {
    get(&format!("/posts/{}/comments", segment(post_id))).await
}

pub async fn add_comment(post_id: &str, body: &str) -> Result<Comment, String> {
    send_json(
        Request::post(&url(&format!("/posts/{}/comments", segment(post_id)))),
        &serde_json::json!({ "body": body }),
    )
    .await
}

pub async fn delete_comment(comment_id: &str) -> Result<(), String> {
    delete(&format!("/comments/{}", segment(comment_id))).await
}

pub async fn set_like(post_id: &str, liked: bool) -> Result<LikeStatus, String> {
    let path = url(&format!("/posts/{}/like", segment(post_id)));
    let builder = if liked {
        Request::post(&path)
    } else {
        Request::delete(&path)
    };
    let response = authed(builder)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    data(response).await
}

// ============ Humidors ============

pub async fn fetch_humidors() -> Result<Vec<Humidor>, String> {
    get("/humidors").await
}

pub async fn fetch_humidor(id: &str) -> Result<Humidor, String> {
    get(&format!("/humidors/{}", segment(id))).await
}

pub async fn create_humidor(name: &str, target_humidity: Option<u8>) -> Result<Humidor, String> {
    send_json(
        Request::post(&url("/humidors")),
        &serde_json::json!({ "name": name, "target_humidity": target_humidity }),
    )
    .await
}

pub async fn delete_humidor(id: &str) -> Result<(), String> {
    delete(&format!("/humidors/{}", segment(id))).await
}

pub async fn fetch_cigars(humidor_id: &str) -> Result<Vec<Cigar>, String> {
    get(&format!("/humidors/{}/cigars", segment(humidor_id))).await
}

pub async fn add_cigar(
    humidor_id: &str,
    brand: &str,
    name: &str,
    vitola: Option<String>,
    quantity: u32,
) -> Result<Cigar, String> {
    send_json(
        Request::post(&url(&format!("/humidors/{}/cigars", segment(humidor_id)))),
        &serde_json::json!({
            "brand": brand,
            "name": name,
            "vitola": vitola,
            "quantity": quantity,
        }),
    )
    .await
}

pub async fn delete_cigar(cigar_id: &str) -> Result<(), String> {
    delete(&format!("/cigars/{}", segment(cigar_id))).await
}

// ============ Reviews ============

pub async fn fetch_reviews(author: Option<&str>, page: u32) -> Result<Page<Review>, String> {
    let mut query = vec![("page", page.to_string()), ("limit", "10".to_string())];
    if let Some(author) = author {
        query.push(("author", author.to_string()));
    }
    let response = authed(Request::get(&url("/reviews")))
        .query(query)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

pub async fn create_review(review: &NewReview) -> Result<Review, String> {
    send_json(Request::post(&url("/reviews")), review).await
}

// ============ Profile & Uploads ============

pub async fn fetch_profile() -> Result<User, String> {
    get("/profile").await
}

pub async fn fetch_user(id: &str) -> Result<User, String> {
    get(&format!("/users/{}", segment(id))).await
}

/// Upload an image picked in a file input; returns its hosted URL
pub async fn upload_image(file: web_sys::File) -> Result<String, String> {
    let form = web_sys::FormData::new().map_err(|_| "Could not build upload form".to_string())?;
    form.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|_| "Could not attach file".to_string())?;

    let response = authed(Request::post(&url("/uploads")))
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    let uploaded: UploadedImage = data(response).await?;
    Ok(uploaded.url)
}

/// Resolve a server-relative upload URL against the API origin
pub fn media_url(url: &str) -> String {
    if url.starts_with('/') {
        let base = get_api_base();
        let origin = base.strip_suffix("/api/v1").unwrap_or(&base);
        format!("{}{}", origin, url)
    } else {
        url.to_string()
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
}

/// Check API health
pub async fn check_health() -> Result<HealthResponse, String> {
    let api_base = get_api_base();
    let health_url = match api_base.strip_suffix("/api/v1") {
        Some(root) => format!("{}/health", root),
        None => format!("{}/health", api_base),
    };

    let response = Request::get(&health_url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err("API is not healthy".to_string());
    }

    response.json().await
        .map_err(|e| format!("Parse error: {}", e))
}
