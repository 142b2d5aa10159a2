use axum::Json;
use garde::Validate;

use crate::error::EnhanceError;
use crate::models::enhancement::{PaletteRequest, PaletteResponse};
use crate::services::image_codec;
use crate::services::palette;

/// POST /api/palette — extract the dominant colors of an uploaded image.
/// Runs entirely locally; no provider call is made.
pub async fn extract_palette(
    Json(req): Json<PaletteRequest>,
) -> Result<Json<PaletteResponse>, EnhanceError> {
    req.validate()
        .map_err(|err| EnhanceError::InvalidInput(err.to_string()))?;

    let raw = req
        .image_base64
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EnhanceError::InvalidInput("Missing image data".to_string()))?;

    let image = image_codec::decode_image_field(raw)
        .map_err(|err| EnhanceError::InvalidInput(err.to_string()))?;

    let num_colors = req.num_colors.unwrap_or(palette::DEFAULT_NUM_COLORS);

    metrics::counter!("palette_requests_total").increment(1);

    let colors = palette::extract_palette(&image, num_colors)
        .map_err(|err| EnhanceError::InvalidInput(err.to_string()))?;

    tracing::info!(colors = colors.len(), "palette extracted");

    Ok(Json(PaletteResponse {
        success: true,
        colors,
    }))
}
