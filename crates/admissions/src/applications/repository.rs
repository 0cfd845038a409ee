use async_trait::async_trait;

use super::domain::{ApplicantRecord, ApplicationId};

/// Read access to the application store so consumers can be exercised against fixtures.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError>;

    /// All stored applications, in store order.
    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("document store request failed: {0}")]
    Transport(String),
    #[error("document '{id}' is malformed: {reason}")]
    InvalidDocument { id: String, reason: String },
}
