use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;

use crate::models::enhancement::EnhanceParams;
use crate::models::job::{JobRef, JobStatus, Submission};
use crate::services::provider::{self, InferenceProvider, ProviderError};

/// Client for the HuggingFace Inference API. This back-end is synchronous:
/// a successful job-creation response carries the enhanced image bytes, so
/// there is never a job to poll.
pub struct HuggingFaceClient {
    http: Client,
    base_url: String,
    model_id: String,
    api_token: String,
}

impl HuggingFaceClient {
    pub fn new(base_url: String, model_id: String, api_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            model_id,
            api_token,
        }
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceClient {
    async fn submit(
        &self,
        image: &[u8],
        params: &EnhanceParams,
    ) -> Result<Submission, ProviderError> {
        let url = format!("{}/models/{}", self.base_url, self.model_id);

        let request_body = serde_json::json!({
            "inputs": base64::engine::general_purpose::STANDARD.encode(image),
            "parameters": {
                "scale": params.scale,
                "mode": params.mode,
            }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(provider::classify_rejection(&text));
        }

        let bytes = response.bytes().await?;
        Ok(Submission::Completed(bytes.to_vec()))
    }

    async fn poll(&self, job: &JobRef) -> Result<JobStatus, ProviderError> {
        // Unreachable in practice: submit never returns Accepted.
        Err(ProviderError::Rejected(format!(
            "HuggingFace inference is synchronous; no job {} to poll",
            job.id
        )))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        provider::fetch_artifact(&self.http, url).await
    }
}
