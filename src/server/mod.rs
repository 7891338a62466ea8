//! # HTTP Server for Card Preview and Printing
//!
//! Exposes the field catalog, template storage and the rendering targets
//! over HTTP for the template editor and print stations.
//!
//! ## Usage
//!
//! ```bash
//! cardpress serve --listen 0.0.0.0:8080 --image-base-url https://cards.example.com
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/fields` | bindable fields |
//! | GET | `/api/item-types` | item palette |
//! | GET | `/api/item-types/:name/default` | new item with editor defaults |
//! | GET/POST | `/api/templates` | list / save |
//! | GET | `/api/templates/:id` | load |
//! | POST | `/api/preview` | face markup |
//! | POST | `/api/capture` | face PNG |
//! | POST | `/api/print` | duplex print document |
//! | POST | `/api/print/images` | image-only print document |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{CardError, Result};

/// Request body limit; templates carry inline images.
const BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/fields", get(handlers::fields::list))
        .route("/api/item-types", get(handlers::fields::item_type_list))
        .route("/api/item-types/:name/default", get(handlers::fields::default_for))
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::save),
        )
        .route("/api/templates/:id", get(handlers::templates::load))
        .route("/api/preview", post(handlers::render::preview))
        .route("/api/capture", post(handlers::render::capture))
        .route("/api/print", post(handlers::print::print))
        .route("/api/print/images", post(handlers::print::print_images))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cardpress::config::EngineConfig;
/// use cardpress::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), cardpress::error::CardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     engine: EngineConfig::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(&config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            CardError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(
        listen = %config.listen_addr,
        templates = %config.engine.templates_dir.display(),
        images = %config.engine.image_base_url,
        "cardpress server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| CardError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
