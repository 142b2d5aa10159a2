use garde::Validate;
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/enhance`. The image field accepts either a
/// bare base64 string or a full `data:` URI.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[garde(skip)]
    pub image_base64: Option<String>,

    #[garde(range(min = 1, max = 4))]
    pub scale: Option<u8>,

    #[garde(skip)]
    pub mode: Option<EnhanceMode>,
}

/// Enhancement filter mode forwarded to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnhanceMode {
    #[default]
    Superres,
    Denoise,
    Restore,
}

/// Parameters forwarded with a job submission, after defaults are applied.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnhanceParams {
    pub scale: u8,
    pub mode: EnhanceMode,
}

impl EnhanceParams {
    pub fn from_request(req: &EnhanceRequest) -> Self {
        Self {
            scale: req.scale.unwrap_or(2),
            mode: req.mode.unwrap_or_default(),
        }
    }
}

/// Success envelope for `POST /api/enhance`.
#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub success: bool,
    /// The enhanced artifact as a data URI.
    pub image: String,
}

/// Request body for `POST /api/palette`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaletteRequest {
    #[garde(skip)]
    pub image_base64: Option<String>,

    #[garde(range(min = 1, max = 12))]
    pub num_colors: Option<usize>,
}

/// Success envelope for `POST /api/palette`.
#[derive(Debug, Serialize)]
pub struct PaletteResponse {
    pub success: bool,
    pub colors: Vec<crate::services::palette::PaletteColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_outside_provider_range_is_rejected() {
        let req = EnhanceRequest {
            image_base64: Some("AAAA".to_string()),
            scale: Some(8),
            mode: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn defaults_applied_when_params_omitted() {
        let req = EnhanceRequest {
            image_base64: Some("AAAA".to_string()),
            scale: None,
            mode: None,
        };
        let params = EnhanceParams::from_request(&req);
        assert_eq!(params.scale, 2);
        assert_eq!(params.mode, EnhanceMode::Superres);
    }

    #[test]
    fn camel_case_fields_deserialize() {
        let req: EnhanceRequest =
            serde_json::from_str(r#"{"imageBase64":"AAAA","scale":4,"mode":"denoise"}"#)
                .expect("valid request body");
        assert_eq!(req.scale, Some(4));
        assert_eq!(req.mode, Some(EnhanceMode::Denoise));
    }
}
