//! # Smokering
//!
//! Client side of a cigar-enthusiast social platform: profiles, humidor
//! inventory, reviews and a social feed with posts, comments and likes.
//! The platform's data lives behind an external REST API and sign-in is
//! delegated to an external identity provider.
//!
//! ## Modules
//!
//! - [`client`]: typed REST client for every backend endpoint
//! - [`auth`]: bearer token providers, including the identity provider session
//! - [`feed`]: paginated feed loading, query cache and new-post polling
//! - [`review`]: the review capture wizard and its stopwatch
//! - [`mock`]: in-memory stand-in backend for development and tests
//! - [`models`]: the server records passed through the client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smokering::client::{ApiClient, ClientConfig};
//! use smokering::feed::{FeedController, FeedSettings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ApiClient::new(ClientConfig::default())?);
//!     let feed = FeedController::new(client, FeedSettings::default());
//!
//!     feed.load_initial().await;
//!     for post in feed.posts().await {
//!         println!("{}: {}", post.author.shown_name(), post.body);
//!     }
//!
//!     // Scrolled to the bottom
//!     feed.on_sentinel(true).await;
//!
//!     // Check for newer posts every 30 seconds
//!     feed.start_polling().await;
//!     let mut new_posts = feed.subscribe();
//!     new_posts.changed().await?;
//!     feed.refresh().await;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod feed;
pub mod logging;
pub mod mock;
pub mod models;
pub mod review;

// Re-export top-level types for convenience
pub use auth::{AuthError, IdentityClient, Session, StaticToken, TokenProvider};

pub use client::{ApiClient, ApiError, ApiResult, ClientConfig, HealthStatus};

pub use config::{Config, ConfigError, LoggingConfig};

pub use feed::{
    FeedController, FeedFilter, FeedKey, FeedPager, FeedSettings, FeedSort, FeedSource,
    FetchStatus, FreshnessPoller, LoadOutcome, PollOutcome, QueryCache,
};

pub use mock::{MockError, MockState};

pub use models::{
    Cigar, Comment, Humidor, LikeStatus, NewPost, NewReview, Page, Post, Review, User,
};

pub use review::{ReviewWizard, Stopwatch, WizardError, WizardStep};
