//! Smokering stand-in backend
//!
//! Run with: cargo run --bin smokering-mock
//!
//! Serves the REST API and the identity provider session endpoints from
//! memory, seeded with three users, a month of posts and two humidors.
//! Sign in as `ash` with `--token dev-token` (or `mike-token`, `sam-token`).
//!
//! # Configuration
//!
//! Environment variables:
//! - `SMOKERING_MOCK_HOST`: Host to bind to (default: 127.0.0.1)
//! - `SMOKERING_MOCK_PORT`: Port to listen on (default: 8090)
//! - `SMOKERING_LOG_LEVEL`, `SMOKERING_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Overrides the log filter entirely

use smokering::config::Config;
use smokering::logging::init_logging;
use smokering::mock::{serve, MockState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_logging(&config.logging);

    tracing::info!(
        "Starting Smokering stand-in backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = MockState::seeded();
    tracing::info!(
        "Seeded demo data; sign in at http://{}:{}/api/auth/signin",
        config.mock.host,
        config.mock.port
    );

    serve(state, &config.mock).await?;
    tracing::info!("Smokering stand-in backend stopped");

    Ok(())
}
