//! # contract: collaborator interfaces of the report pipeline
//!
//! The pipeline itself is a sequence of pure in-memory transforms. Everything it
//! talks to outside of that sits behind one of the traits in this module:
//!
//! - [`TextGenerator`]: the external generative-text service used by the
//!   delegated synthesis strategy. Retries and timeouts belong to implementors.
//! - [`ProgressReporter`]: where job milestones, the finished artifact, or a
//!   terminal failure are written, keyed by [`SessionId`].
//! - [`JobStore`]: the read side of the same store, polled by whoever started
//!   the job.
//!
//! ## Mocking & Testing
//! - Traits are annotated for `mockall`; the mocks are exported behind the
//!   `test-export-mocks` feature so dependent crates can use them in their tests.
//!
//! ## Implementations
//! - [`crate::progress::InMemoryJobStore`] implements both store traits.
//! - The CLI crate provides the HTTP text generator and its retry wrapper.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::GenerationError;

/// Identifier of one generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        SessionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finished report ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Sum of the chapter word counts.
    pub word_count: usize,
    pub chapter_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

/// Snapshot returned when polling a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub percent: u8,
    pub message: String,
    pub state: JobState,
    /// Rough seconds left, from the last milestone. `None` once a job has failed.
    pub eta_secs: Option<u32>,
    /// Present once `state` is [`JobState::Completed`].
    pub artifact: Option<ReportArtifact>,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        self.state != JobState::Running
    }
}

/// External generative-text service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns generated prose for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Write side of the job store.
///
/// Writes are last-write-wins per session; callers are responsible for keeping
/// the reported percentages non-decreasing.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// Records an intermediate milestone with an estimate of the seconds left.
    async fn report(&self, session: &SessionId, percent: u8, message: &str, eta_secs: u32);

    /// Records success: percent becomes 100 and the artifact is attached.
    async fn complete(&self, session: &SessionId, artifact: ReportArtifact);

    /// Records a terminal failure, keeping the last reported percent.
    async fn fail(&self, session: &SessionId, message: &str);
}

/// Read side of the job store.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Latest status for `session`, or `None` if unknown or evicted.
    async fn status(&self, session: &SessionId) -> Option<JobStatus>;

    /// Removes and returns the entry, typically after its artifact was downloaded.
    async fn evict(&self, session: &SessionId) -> Option<JobStatus>;
}
