//! API layer - HTTP handlers and routing
//!
//! - `GET /` renders the post listing through the theme engine
//! - `/api/v1` serves the same data as JSON, plus a health check

pub mod error;
pub mod health;
pub mod posts;
pub mod responses;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, PageError};
pub use state::AppState;

/// Build the application router
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/", get(posts::index))
        .nest("/api/v1", build_api_router().layer(cors_layer(cors_origin)))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/health", get(health::health))
}

/// CORS for the read-only JSON API. `*` allows any origin; an origin that
/// is not a valid header value is logged and no cross-origin access is granted.
fn cors_layer(cors_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    if cors_origin == "*" {
        return cors.allow_origin(Any);
    }

    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin '{}': {}", cors_origin, e);
            cors
        }
    }
}
