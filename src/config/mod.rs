use serde::Deserialize;

/// Which inference back-end enhancement jobs are submitted to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// HuggingFace Inference API; returns the artifact in the response body.
    #[default]
    Huggingface,
    /// Replicate-style prediction API; returns a job that must be polled.
    Replicate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Inference back-end to use.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Provider API token. Optional so the server can boot without one;
    /// enhancement requests fail with a configuration error until it is set.
    pub provider_api_token: Option<String>,

    /// Model identifier: a repo id for HuggingFace, a version hash for
    /// Replicate.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// HuggingFace Inference API base URL.
    #[serde(default = "default_huggingface_base_url")]
    pub huggingface_base_url: String,

    /// Replicate API base URL.
    #[serde(default = "default_replicate_base_url")]
    pub replicate_base_url: String,

    /// Ceiling on the decoded image payload, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Interval between job status checks, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Wall-clock ceiling on waiting for a job, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Total submission attempts while the provider's model is warming up.
    #[serde(default = "default_submit_attempts")]
    pub submit_attempts: u32,

    /// Delay between submission attempts, in seconds.
    #[serde(default = "default_submit_retry_secs")]
    pub submit_retry_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_model_id() -> String {
    "xinntao/Real-ESRGAN".to_string()
}

fn default_huggingface_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_replicate_base_url() -> String {
    "https://api.replicate.com".to_string()
}

fn default_max_image_bytes() -> usize {
    1024 * 1024 // 1 MB
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn default_submit_attempts() -> u32 {
    3
}

fn default_submit_retry_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
