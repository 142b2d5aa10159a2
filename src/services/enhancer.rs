use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::AppConfig;
use crate::error::EnhanceError;
use crate::models::enhancement::EnhanceParams;
use crate::models::job::{JobRef, JobStatus, ResultLocation, Submission};
use crate::services::provider::{InferenceProvider, ProviderError};

/// Knobs for one enhancement flow, taken from configuration so tests can
/// inject small values.
#[derive(Debug, Clone)]
pub struct EnhancerSettings {
    /// Ceiling on the decoded image payload, in bytes.
    pub max_image_bytes: usize,
    /// Interval between job status checks.
    pub poll_interval: Duration,
    /// Wall-clock ceiling on waiting for a job, measured from submission.
    pub poll_timeout: Duration,
    /// Total submission attempts while the provider's model warms up.
    pub submit_attempts: u32,
    /// Delay between submission attempts.
    pub submit_retry_delay: Duration,
}

impl EnhancerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_image_bytes: config.max_image_bytes,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            submit_attempts: config.submit_attempts,
            submit_retry_delay: Duration::from_secs(config.submit_retry_secs),
        }
    }
}

/// Drives one enhancement request through submit, poll, and fetch. Holds no
/// cross-request state: every invocation owns its own job reference and
/// makes its own outbound calls.
pub struct Enhancer {
    provider: Option<Arc<dyn InferenceProvider>>,
    settings: EnhancerSettings,
}

impl Enhancer {
    pub fn new(provider: Option<Arc<dyn InferenceProvider>>, settings: EnhancerSettings) -> Self {
        Self { provider, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn max_image_bytes(&self) -> usize {
        self.settings.max_image_bytes
    }

    /// Run one image through the configured provider and return the enhanced
    /// bytes, or the single terminal error for this request.
    pub async fn enhance(
        &self,
        image: &[u8],
        params: &EnhanceParams,
    ) -> Result<Vec<u8>, EnhanceError> {
        let provider = self
            .provider
            .as_deref()
            .ok_or(EnhanceError::Misconfiguration)?;

        if image.len() > self.settings.max_image_bytes {
            return Err(EnhanceError::PayloadTooLarge {
                limit_bytes: self.settings.max_image_bytes,
            });
        }

        let submission = self.submit_with_retry(provider, image, params).await?;
        // Monotonic deadline, captured once at submission.
        let deadline = Instant::now() + self.settings.poll_timeout;

        let location = match submission {
            Submission::Completed(bytes) => return Ok(bytes),
            Submission::Accepted(job) => {
                tracing::debug!(job_id = %job.id, "job accepted, polling");
                self.poll_until_done(provider, &job, deadline).await?
            }
        };

        match location {
            ResultLocation::Inline(bytes) => Ok(bytes),
            ResultLocation::Url(url) => provider
                .fetch(&url)
                .await
                .map_err(|err| EnhanceError::Fetch(err.to_string())),
        }
    }

    /// Submit the job, retrying only while the provider reports its model is
    /// still warming up. Any other rejection is terminal on first sight.
    async fn submit_with_retry(
        &self,
        provider: &dyn InferenceProvider,
        image: &[u8],
        params: &EnhanceParams,
    ) -> Result<Submission, EnhanceError> {
        for attempt in 1..=self.settings.submit_attempts {
            match provider.submit(image, params).await {
                Ok(submission) => return Ok(submission),
                Err(ProviderError::WarmingUp(detail))
                    if attempt < self.settings.submit_attempts =>
                {
                    tracing::info!(attempt, detail = %detail, "model warming up, retrying submission");
                    sleep(self.settings.submit_retry_delay).await;
                }
                Err(ProviderError::WarmingUp(_)) => break,
                Err(ProviderError::Rejected(detail)) => return Err(EnhanceError::Provider(detail)),
                Err(ProviderError::Http(err)) => {
                    return Err(EnhanceError::Provider(err.to_string()))
                }
            }
        }

        Err(EnhanceError::Provider(format!(
            "model still loading after {} attempts",
            self.settings.submit_attempts
        )))
    }

    /// Poll at a fixed interval until the job reaches a terminal state or
    /// the deadline passes.
    async fn poll_until_done(
        &self,
        provider: &dyn InferenceProvider,
        job: &JobRef,
        deadline: Instant,
    ) -> Result<ResultLocation, EnhanceError> {
        loop {
            match provider.poll(job).await {
                Ok(JobStatus::Succeeded(location)) => return Ok(location),
                Ok(JobStatus::Failed(detail)) => return Err(EnhanceError::Provider(detail)),
                Ok(JobStatus::Submitted | JobStatus::Running) => {}
                Err(err) => return Err(EnhanceError::Provider(err.to_string())),
            }

            if Instant::now() >= deadline {
                return Err(EnhanceError::Timeout);
            }
            sleep(self.settings.poll_interval).await;
        }
    }
}
