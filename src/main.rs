mod app_state;
mod config;
mod error;
mod models;
mod routes;
mod services;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::enhancer::{Enhancer, EnhancerSettings};
use services::provider;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing enhance-gateway server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "enhance_requests_total",
        "Total enhancement requests received"
    );
    metrics::describe_counter!(
        "enhance_completed_total",
        "Total enhancement requests that returned an artifact"
    );
    metrics::describe_counter!(
        "enhance_failures_total",
        "Total enhancement requests that ended in a terminal error"
    );
    metrics::describe_histogram!(
        "enhance_duration_seconds",
        "End-to-end time spent on one enhancement request"
    );
    metrics::describe_counter!("palette_requests_total", "Total palette extraction requests");

    // Build the configured inference provider
    let provider = provider::build_provider(&config);
    if provider.is_none() {
        tracing::warn!(
            provider = %config.provider,
            "No provider API token configured; enhancement requests will fail"
        );
    }

    let enhancer = Enhancer::new(provider, EnhancerSettings::from_config(&config));
    let state = AppState::new(enhancer, config.provider);

    // Hard cap on inbound bodies; the router raises axum's own limit to the
    // same bound so oversized-but-sane payloads still reach the handler.
    let body_limit = 4 * config.max_image_bytes;

    let app = routes::api_router(state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(body_limit));

    tracing::info!(provider = %config.provider, "Starting enhance-gateway on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
