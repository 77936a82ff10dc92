//! Stand-in Backend
//!
//! In-memory implementation of the platform's REST API and the identity
//! provider's session endpoint, built with Axum. Used for local front-end
//! development and by the client integration tests.
//!
//! # Endpoints
//!
//! ## Feed
//! - `GET /api/v1/feed` - One page of the feed
//! - `GET /api/v1/feed/latest` - Newest post for a filter
//!
//! ## Posts
//! - `POST /api/v1/posts`, `GET|PATCH|DELETE /api/v1/posts/:id`
//! - `GET|POST /api/v1/posts/:id/comments`, `PATCH|DELETE /api/v1/comments/:id`
//! - `POST|DELETE /api/v1/posts/:id/like`
//!
//! ## Humidors
//! - `GET|POST /api/v1/humidors`, `GET|PATCH|DELETE /api/v1/humidors/:id`
//! - `GET|POST /api/v1/humidors/:id/cigars`, `PATCH|DELETE /api/v1/cigars/:id`
//!
//! ## Reviews
//! - `GET|POST /api/v1/reviews`, `GET|PATCH|DELETE /api/v1/reviews/:id`
//!
//! ## Profiles and uploads
//! - `GET /api/v1/profile`, `GET /api/v1/users/:id`
//! - `POST /api/v1/uploads`, `GET /api/v1/uploads/:id`
//!
//! ## Identity provider
//! - `GET /api/auth/session`, `/api/auth/signin`, `/api/auth/signout`
//!
//! ## Health
//! - `GET /health`
//!
//! Every mutation needs `Authorization: Bearer <token>` for a seeded user
//! (`dev-token` is `ash`).

pub mod error;
pub mod routes;
pub mod state;

pub use error::{MockError, MockResult};
pub use state::{MockState, Store, DEV_TOKEN, SESSION_COOKIE};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::client::MAX_UPLOAD_BYTES;
use crate::config::MockConfig;

/// Build the stand-in router with all routes and middleware
pub fn build_router(state: MockState) -> Router {
    let api_routes = Router::new()
        // Feed routes
        .route("/feed", get(routes::feed::feed_page))
        .route("/feed/latest", get(routes::feed::latest_post))
        // Post routes
        .route("/posts", post(routes::posts::create_post))
        .route(
            "/posts/:id",
            get(routes::posts::get_post)
                .patch(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        )
        .route(
            "/posts/:id/comments",
            get(routes::posts::list_comments).post(routes::posts::add_comment),
        )
        .route(
            "/comments/:id",
            patch(routes::posts::update_comment).delete(routes::posts::delete_comment),
        )
        .route(
            "/posts/:id/like",
            post(routes::posts::like_post).delete(routes::posts::unlike_post),
        )
        // Humidor routes
        .route(
            "/humidors",
            get(routes::humidors::list_humidors).post(routes::humidors::create_humidor),
        )
        .route(
            "/humidors/:id",
            get(routes::humidors::get_humidor)
                .patch(routes::humidors::update_humidor)
                .delete(routes::humidors::delete_humidor),
        )
        .route(
            "/humidors/:id/cigars",
            get(routes::humidors::list_cigars).post(routes::humidors::add_cigar),
        )
        .route(
            "/cigars/:id",
            patch(routes::humidors::update_cigar).delete(routes::humidors::delete_cigar),
        )
        // Review routes
        .route(
            "/reviews",
            get(routes::reviews::list_reviews).post(routes::reviews::create_review),
        )
        .route(
            "/reviews/:id",
            get(routes::reviews::get_review)
                .patch(routes::reviews::update_review)
                .delete(routes::reviews::delete_review),
        )
        // Profile routes
        .route("/profile", get(routes::profile::own_profile))
        .route("/users/:id", get(routes::profile::user_profile))
        // Upload routes - body limit leaves room for multipart framing
        .route("/uploads", post(routes::profile::upload_image))
        .route("/uploads/:id", get(routes::profile::get_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024));

    let auth_routes = Router::new()
        .route("/session", get(routes::session::session))
        .route("/signin", get(routes::session::sign_in))
        .route("/signout", get(routes::session::sign_out));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/api/auth", auth_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        // the front-end reads the session cookie cross-origin
        .layer(CorsLayer::very_permissive())
        .with_state(shared_state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_listener<F>(listener: TcpListener, state: MockState, shutdown: F) -> Result<(), MockError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| MockError::Internal(format!("Server error: {}", e)))
}

/// Start the stand-in backend and run until Ctrl+C or SIGTERM
pub async fn serve(state: MockState, config: &MockConfig) -> Result<(), MockError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Smokering stand-in backend listening on http://{}", addr);
    serve_listener(listener, state, shutdown_signal()).await?;
    tracing::info!("Smokering stand-in backend shut down gracefully");
    Ok(())
}

/// Serve on an ephemeral localhost port in the background
///
/// Returns the bound address; the server lives until the runtime shuts down.
pub async fn spawn(state: MockState) -> Result<SocketAddr, MockError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = serve_listener(listener, state, std::future::pending()).await {
            tracing::error!(error = %e, "Stand-in backend stopped");
        }
    });

    Ok(addr)
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn app() -> Router {
        build_router(MockState::seeded())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_feed_page_envelope() {
        let (status, body) = send(app(), get("/api/v1/feed?page=1&limit=10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
        assert_eq!(body["page"], 1);
        assert_eq!(body["has_more"], true);

        let (_, last) = send(app(), get("/api/v1/feed?page=3&limit=10")).await;
        assert_eq!(last["has_more"], false);
    }

    #[tokio::test]
    async fn test_reviews_filter_only_returns_shared_reviews() {
        let (_, body) = send(app(), get("/api/v1/feed?filter=reviews&limit=50")).await;
        let posts = body["data"].as_array().unwrap();
        assert!(!posts.is_empty());
        assert!(posts.iter().all(|p| p["review_id"].is_string()));
    }

    #[tokio::test]
    async fn test_following_filter_needs_viewer() {
        let (_, anonymous) = send(app(), get("/api/v1/feed?filter=following")).await;
        assert!(anonymous["data"].as_array().unwrap().is_empty());

        let request = json_request("GET", "/api/v1/feed?filter=following&limit=50", Some(DEV_TOKEN), "");
        let (_, body) = send(app(), request).await;
        let posts = body["data"].as_array().unwrap();
        assert!(!posts.is_empty());
        assert!(posts.iter().all(|p| p["author"]["id"] == "u2"));
    }

    #[tokio::test]
    async fn test_latest_matches_first_feed_post() {
        let (_, feed) = send(app(), get("/api/v1/feed?limit=1")).await;
        let (_, latest) = send(app(), get("/api/v1/feed/latest")).await;
        assert_eq!(feed["data"][0]["id"], latest["data"]["id"]);

        let (_, empty) = send(build_router(MockState::empty()), get("/api/v1/feed/latest")).await;
        assert!(empty["data"].is_null());
    }

    #[tokio::test]
    async fn test_mutation_without_token_is_401() {
        let request = json_request("POST", "/api/v1/posts", None, r#"{"body": "hi"}"#);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body["request_id"].is_string());

        let request = json_request("POST", "/api/v1/posts", Some("bogus"), r#"{"body": "hi"}"#);
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_post_then_feed_shows_it_first() {
        let app = app();
        let request = json_request("POST", "/api/v1/posts", Some(DEV_TOKEN), r#"{"body": "Evening Padron"}"#);
        let (status, created) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["author"]["username"], "ash");

        let (_, latest) = send(app, get("/api/v1/feed/latest")).await;
        assert_eq!(latest["data"]["id"], created["data"]["id"]);
    }

    #[tokio::test]
    async fn test_empty_post_rejected() {
        let request = json_request("POST", "/api/v1/posts", Some(DEV_TOKEN), r#"{"body": "   "}"#);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_like_and_unlike() {
        let app = app();
        let (_, latest) = send(app.clone(), get("/api/v1/feed/latest")).await;
        let id = latest["data"]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/posts/{}/like", id);

        let (status, liked) = send(app.clone(), json_request("POST", &uri, Some("sam-token"), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked["data"]["liked"], true);
        let count = liked["data"]["like_count"].as_u64().unwrap();

        // liking twice is idempotent
        let (_, again) = send(app.clone(), json_request("POST", &uri, Some("sam-token"), "")).await;
        assert_eq!(again["data"]["like_count"].as_u64().unwrap(), count);

        let (_, unliked) = send(app, json_request("DELETE", &uri, Some("sam-token"), "")).await;
        assert_eq!(unliked["data"]["liked"], false);
        assert_eq!(unliked["data"]["like_count"].as_u64().unwrap(), count - 1);
    }

    #[tokio::test]
    async fn test_cannot_delete_someone_elses_post() {
        let app = app();
        let (_, feed) = send(app.clone(), get("/api/v1/feed?limit=50")).await;
        let foreign = feed["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["author"]["id"] != "u1")
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let request = json_request("DELETE", &format!("/api/v1/posts/{}", foreign), Some(DEV_TOKEN), "");
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_humidors_are_private() {
        let (status, body) = send(app(), json_request("GET", "/api/v1/humidors", Some(DEV_TOKEN), "")).await;
        assert_eq!(status, StatusCode::OK);
        let humidors = body["data"].as_array().unwrap();
        assert_eq!(humidors.len(), 1);
        assert!(humidors[0]["cigar_count"].as_u64().unwrap() > 0);

        let (status, _) = send(app(), get("/api/v1/humidors")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_review_rating_validated() {
        let request = json_request(
            "POST",
            "/api/v1/reviews",
            Some(DEV_TOKEN),
            r#"{"cigar_name": "Padron 1926", "rating": 120}"#,
        );
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_from_cookie() {
        let (_, anonymous) = send(app(), get("/api/auth/session")).await;
        assert_eq!(anonymous, serde_json::json!({}));

        let request = Request::builder()
            .uri("/api/auth/session")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, DEV_TOKEN))
            .body(Body::empty())
            .unwrap();
        let (_, session) = send(app(), request).await;
        assert_eq!(session["accessToken"], DEV_TOKEN);
        assert_eq!(session["user"]["id"], "u1");
    }

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let app = app();
        let boundary = "smokeringboundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"band.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/uploads")
            .header(header::AUTHORIZATION, format!("Bearer {}", DEV_TOKEN))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, uploaded) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::CREATED);
        let url = uploaded["data"]["url"].as_str().unwrap().to_string();

        let response = app.oneshot(get(&url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"PNGDATA");
    }
}
