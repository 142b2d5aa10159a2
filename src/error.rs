use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Terminal outcomes of an enhancement request, mapped onto the error
/// envelope `{ "error": <message> }` at the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// Provider API token is not configured.
    #[error("API configuration error")]
    Misconfiguration,

    /// Missing or malformed image payload.
    #[error("{0}")]
    InvalidInput(String),

    /// Decoded payload exceeds the configured ceiling.
    #[error("Image too large (max {})", format_limit(.limit_bytes))]
    PayloadTooLarge { limit_bytes: usize },

    /// Provider rejected the job, reported a failed job, or the warm-up
    /// retry bound was exhausted. Carries the provider's own message.
    #[error("AI processing failed: {0}")]
    Provider(String),

    /// Polling exceeded the wall-clock ceiling.
    #[error("Enhancement timed out")]
    Timeout,

    /// The provider reported success but the artifact could not be fetched.
    #[error("Failed to retrieve enhanced image: {0}")]
    Fetch(String),
}

const MB: usize = 1024 * 1024;

/// Render the configured ceiling without truncation: whole megabytes stay
/// integral ("1MB"), anything else keeps one decimal ("1.5MB", "0.5MB").
fn format_limit(bytes: &usize) -> String {
    if bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{:.1}MB", *bytes as f64 / MB as f64)
    }
}

impl IntoResponse for EnhanceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Misconfiguration | Self::Provider(_) | Self::Fetch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
