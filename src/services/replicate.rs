use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::enhancement::EnhanceParams;
use crate::models::job::{JobRef, JobStatus, ResultLocation, Submission};
use crate::services::image_codec;
use crate::services::provider::{self, InferenceProvider, ProviderError};

/// Client for a Replicate-style prediction API. Job creation returns a
/// prediction id plus a status URL; the artifact is referenced by URL once
/// the prediction succeeds.
pub struct ReplicateClient {
    http: Client,
    base_url: String,
    model_version: String,
    api_token: String,
}

/// Prediction document returned by both the create and status endpoints.
#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    urls: Option<PredictionUrls>,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

/// Replicate's status vocabulary.
#[derive(Debug, Clone, Copy, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum PredictionState {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl ReplicateClient {
    pub fn new(base_url: String, model_version: String, api_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            model_version,
            api_token,
        }
    }

    fn status_url(&self, job: &JobRef) -> String {
        job.poll_url
            .clone()
            .unwrap_or_else(|| format!("{}/v1/predictions/{}", self.base_url, job.id))
    }
}

/// Map a prediction document onto the normalized job status.
fn normalize(prediction: Prediction) -> Result<JobStatus, ProviderError> {
    let state = PredictionState::from_str(&prediction.status).map_err(|_| {
        ProviderError::Rejected(format!(
            "unrecognized prediction status: {}",
            prediction.status
        ))
    })?;

    Ok(match state {
        PredictionState::Starting => JobStatus::Submitted,
        PredictionState::Processing => JobStatus::Running,
        PredictionState::Succeeded => {
            let url = output_url(prediction.output.as_ref()).ok_or_else(|| {
                ProviderError::Rejected("prediction succeeded without an output URL".to_string())
            })?;
            JobStatus::Succeeded(ResultLocation::Url(url))
        }
        PredictionState::Failed | PredictionState::Canceled => JobStatus::Failed(
            prediction
                .error
                .unwrap_or_else(|| "prediction failed without detail".to_string()),
        ),
    })
}

/// The output field is a bare URL string or an array of them; take the first.
fn output_url(output: Option<&serde_json::Value>) -> Option<String> {
    match output? {
        serde_json::Value::String(url) => Some(url.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.as_str().map(str::to_string)),
        _ => None,
    }
}

#[async_trait]
impl InferenceProvider for ReplicateClient {
    async fn submit(
        &self,
        image: &[u8],
        params: &EnhanceParams,
    ) -> Result<Submission, ProviderError> {
        let url = format!("{}/v1/predictions", self.base_url);

        let request_body = serde_json::json!({
            "version": self.model_version,
            "input": {
                "image": image_codec::to_data_uri(image),
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

        let prediction: Prediction = response.json().await?;
        let poll_url = prediction.urls.as_ref().and_then(|urls| urls.get.clone());

        Ok(Submission::Accepted(JobRef {
            id: prediction.id,
            poll_url,
        }))
    }

    async fn poll(&self, job: &JobRef) -> Result<JobStatus, ProviderError> {
        let response = self
            .http
            .get(self.status_url(job))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected(text));
        }

        let prediction: Prediction = response.json().await?;
        normalize(prediction)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        provider::fetch_artifact(&self.http, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(status: &str, output: serde_json::Value, error: Option<&str>) -> Prediction {
        Prediction {
            id: "p1".to_string(),
            status: status.to_string(),
            urls: None,
            output: Some(output),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn provider_statuses_map_onto_small_enumeration() {
        let starting = normalize(prediction("starting", serde_json::Value::Null, None)).unwrap();
        assert_eq!(starting, JobStatus::Submitted);

        let processing =
            normalize(prediction("processing", serde_json::Value::Null, None)).unwrap();
        assert_eq!(processing, JobStatus::Running);
    }

    #[test]
    fn succeeded_carries_first_output_url() {
        let status = normalize(prediction(
            "succeeded",
            serde_json::json!(["https://host/result.png"]),
            None,
        ))
        .unwrap();
        assert_eq!(
            status,
            JobStatus::Succeeded(ResultLocation::Url("https://host/result.png".to_string()))
        );
    }

    #[test]
    fn failed_carries_provider_detail() {
        let status = normalize(prediction(
            "failed",
            serde_json::Value::Null,
            Some("CUDA out of memory"),
        ))
        .unwrap();
        assert_eq!(status, JobStatus::Failed("CUDA out of memory".to_string()));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = normalize(prediction("teleporting", serde_json::Value::Null, None));
        assert!(matches!(err, Err(ProviderError::Rejected(_))));
    }
}
