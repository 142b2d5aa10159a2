use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: ProviderHealth,
}

#[derive(Serialize)]
pub struct ProviderHealth {
    pub name: String,
    pub credential: &'static str,
}

/// GET /health — reports whether the gateway can accept enhancement work.
/// Checks configuration only; no outbound provider call is made.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let configured = state.enhancer.is_configured();

    let (status_code, status) = if configured {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: ProviderHealth {
            name: state.provider_kind.to_string(),
            credential: if configured { "configured" } else { "missing" },
        },
    };

    (status_code, Json(response))
}
