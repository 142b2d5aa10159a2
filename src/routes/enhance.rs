use axum::extract::State;
use axum::Json;
use garde::Validate;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::EnhanceError;
use crate::models::enhancement::{EnhanceParams, EnhanceRequest, EnhanceResponse};
use crate::services::image_codec;

/// POST /api/enhance — submit an image to the configured inference provider
/// and return the enhanced artifact as a data URI.
pub async fn enhance_image(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, EnhanceError> {
    req.validate()
        .map_err(|err| EnhanceError::InvalidInput(err.to_string()))?;

    let raw = req
        .image_base64
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EnhanceError::InvalidInput("Missing image data".to_string()))?;

    let image = image_codec::decode_image_field(raw)
        .map_err(|err| EnhanceError::InvalidInput(err.to_string()))?;

    let params = EnhanceParams::from_request(&req);
    let request_id = Uuid::new_v4();

    tracing::info!(
        %request_id,
        input_bytes = image.len(),
        scale = params.scale,
        mode = %params.mode,
        "enhancement request"
    );
    metrics::counter!("enhance_requests_total").increment(1);

    let start = std::time::Instant::now();
    let result = state.enhancer.enhance(&image, &params).await;
    metrics::histogram!("enhance_duration_seconds").record(start.elapsed().as_secs_f64());

    match result {
        Ok(bytes) => {
            metrics::counter!("enhance_completed_total").increment(1);
            tracing::info!(%request_id, output_bytes = bytes.len(), "enhancement complete");
            Ok(Json(EnhanceResponse {
                success: true,
                image: image_codec::to_data_uri(&bytes),
            }))
        }
        Err(err) => {
            metrics::counter!("enhance_failures_total").increment(1);
            tracing::warn!(%request_id, error = %err, "enhancement failed");
            Err(err)
        }
    }
}
