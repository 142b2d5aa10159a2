pub mod enhance;
pub mod health;
pub mod metrics;
pub mod palette;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;

/// API routes plus the permissive CORS layer every response carries,
/// including pre-flight `OPTIONS`. Outer layers (tracing, compression,
/// the hard body cap) and the metrics route are attached in `main`.
pub fn api_router(state: AppState) -> Router {
    // Inbound bodies carry base64, which inflates the payload by 4/3.
    // Raise axum's built-in 2 MB body limit past the decoded-size ceiling
    // so oversized payloads reach the handler and get the structured 413
    // envelope instead of a bare limit rejection.
    let body_limit = 4 * state.enhancer.max_image_bytes();

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/enhance", post(enhance::enhance_image))
        .route("/api/palette", post(palette::extract_palette))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
}
