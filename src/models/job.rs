/// Transient reference to a job owned by the remote provider. Held only for
/// the duration of one enhancement request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRef {
    /// Opaque identifier assigned by the provider on submission.
    pub id: String,
    /// Status URL, when the provider hands one back alongside the id.
    pub poll_url: Option<String>,
}

/// Where a finished job's artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLocation {
    /// The provider returned the artifact bytes directly.
    Inline(Vec<u8>),
    /// The artifact must be fetched from this URL.
    Url(String),
}

/// Normalized job state. Provider-specific status strings are mapped onto
/// this small enumeration by each adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Running,
    Succeeded(ResultLocation),
    Failed(String),
}

/// Outcome of one job-creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Synchronous provider: the artifact came back in the response body.
    Completed(Vec<u8>),
    /// Asynchronous provider: a job was accepted and must be polled.
    Accepted(JobRef),
}
