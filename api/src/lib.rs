//! HTTP surface of the relay gateway.
//!
//! A single wildcard route carries the whole proxied surface:
//! `ANY /{prefix}/{sub_path...}`. The only route the gateway answers
//! itself is `GET /health`.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod forward;
pub mod handlers;
pub mod models;
pub mod server;

// Re-export server functions for convenience
pub use server::{spawn_server, start_server, ApiConfig};

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use forward::{Forwarder, GATEWAY_USER_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn directory::Directory>,
    pub authenticator: session::Authenticator,
    pub decisions: authz::DecisionEngine,
    pub forwarder: Forwarder,
}

/// Create the main router: health endpoint plus the proxy fallback that
/// captures every other method and path.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .fallback(handlers::proxy::proxy_request)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
