//! In-memory job store.
//!
//! A `HashMap` behind a tokio `RwLock`, shared by cloning the store handle.
//! Entries live until evicted or until the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::contract::{JobState, JobStatus, JobStore, ProgressReporter, ReportArtifact, SessionId};

#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    entries: Arc<RwLock<HashMap<SessionId, JobStatus>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ProgressReporter for InMemoryJobStore {
    async fn report(&self, session: &SessionId, percent: u8, message: &str, eta_secs: u32) {
        let mut entries = self.entries.write().await;
        let status = entries.entry(session.clone()).or_insert_with(|| JobStatus {
            percent: 0,
            message: String::new(),
            state: JobState::Running,
            eta_secs: None,
            artifact: None,
        });
        if status.is_terminal() {
            warn!(session = %session, percent, "Progress reported for a finished job, ignoring");
            return;
        }
        // Percentages never go backwards.
        status.percent = status.percent.max(percent.min(100));
        status.message = message.to_string();
        status.eta_secs = Some(eta_secs);
        debug!(session = %session, percent = status.percent, message, eta_secs, "Progress");
    }

    async fn complete(&self, session: &SessionId, artifact: ReportArtifact) {
        let mut entries = self.entries.write().await;
        entries.insert(
            session.clone(),
            JobStatus {
                percent: 100,
                message: "Report generated successfully!".to_string(),
                state: JobState::Completed,
                eta_secs: Some(0),
                artifact: Some(artifact),
            },
        );
    }

    async fn fail(&self, session: &SessionId, message: &str) {
        let mut entries = self.entries.write().await;
        let percent = entries.get(session).map(|s| s.percent).unwrap_or(0);
        entries.insert(
            session.clone(),
            JobStatus {
                percent,
                message: format!("Error: {message}"),
                state: JobState::Failed,
                eta_secs: None,
                artifact: None,
            },
        );
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn status(&self, session: &SessionId) -> Option<JobStatus> {
        self.entries.read().await.get(session).cloned()
    }

    async fn evict(&self, session: &SessionId) -> Option<JobStatus> {
        self.entries.write().await.remove(session)
    }
}
