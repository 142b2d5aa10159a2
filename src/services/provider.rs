use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, ProviderKind};
use crate::models::enhancement::EnhanceParams;
use crate::models::job::{JobRef, JobStatus, Submission};
use crate::services::huggingface::HuggingFaceClient;
use crate::services::replicate::ReplicateClient;

/// Error substring that marks a rejection as transient: HuggingFace returns
/// "Model <id> is currently loading" while a cold model spins up. Any other
/// rejection text (including "Not Found") is terminal.
const TRANSIENT_MARKER: &str = "loading";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The model is still warming up; the same submission may succeed
    /// shortly.
    #[error("model is warming up: {0}")]
    WarmingUp(String),

    /// The provider reported an error that will not resolve by retrying.
    #[error("{0}")]
    Rejected(String),

    /// The outbound request itself failed.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Classify a non-success job-creation response by its error text.
pub fn classify_rejection(body: &str) -> ProviderError {
    if body.contains(TRANSIENT_MARKER) {
        ProviderError::WarmingUp(body.to_string())
    } else {
        ProviderError::Rejected(body.to_string())
    }
}

/// One hosted inference back-end. Adapters normalize each provider's wire
/// format into the `submit` / `poll` / `fetch` shape the enhancer drives.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Create one enhancement job. Synchronous providers return the artifact
    /// directly; asynchronous ones return a job reference to poll.
    async fn submit(
        &self,
        image: &[u8],
        params: &EnhanceParams,
    ) -> Result<Submission, ProviderError>;

    /// Check the status of a previously accepted job.
    async fn poll(&self, job: &JobRef) -> Result<JobStatus, ProviderError>;

    /// Retrieve a finished artifact referenced by URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Build the configured provider adapter, or `None` when no API token is
/// configured (surfaced per request as a configuration error).
pub fn build_provider(config: &AppConfig) -> Option<Arc<dyn InferenceProvider>> {
    let token = config.provider_api_token.clone()?;
    let provider: Arc<dyn InferenceProvider> = match config.provider {
        ProviderKind::Huggingface => Arc::new(HuggingFaceClient::new(
            config.huggingface_base_url.clone(),
            config.model_id.clone(),
            token,
        )),
        ProviderKind::Replicate => Arc::new(ReplicateClient::new(
            config.replicate_base_url.clone(),
            config.model_id.clone(),
            token,
        )),
    };
    Some(provider)
}

/// Shared result-URL fetch used by both adapters. Result URLs are
/// pre-authorized by the provider, so no credential is attached.
pub(crate) async fn fetch_artifact(
    http: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, ProviderError> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ProviderError::Rejected(format!(
            "artifact fetch returned {}",
            response.status()
        )));
    }
    Ok(response.bytes().await?.to_vec())
}
