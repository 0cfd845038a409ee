use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use super::domain::{ApplicantRecord, ApplicationId};
use super::repository::{ApplicationRepository, RepositoryError};

/// Store-ordered in-memory repository used for fixtures, demos and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<RwLock<Vec<ApplicantRecord>>>,
}

impl InMemoryApplicationRepository {
    pub fn with_records(records: Vec<ApplicantRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load a JSON fixture holding an array of application documents.
    ///
    /// Documents without an `id` are numbered by position (`fixture-0001`, ...).
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            RepositoryError::Unavailable(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RepositoryError> {
        let documents: Vec<Value> =
            serde_json::from_str(raw).map_err(|err| RepositoryError::InvalidDocument {
                id: "<fixture>".to_string(),
                reason: err.to_string(),
            })?;

        let mut records = Vec::with_capacity(documents.len());
        for (index, document) in documents.into_iter().enumerate() {
            let fallback_id = format!("fixture-{:04}", index + 1);
            let mut record: ApplicantRecord =
                serde_json::from_value(document).map_err(|err| {
                    RepositoryError::InvalidDocument {
                        id: fallback_id.clone(),
                        reason: err.to_string(),
                    }
                })?;
            if record.id.0.is_empty() {
                record.id = ApplicationId(fallback_id);
            }
            records.push(record);
        }

        Ok(Self::with_records(records))
    }

    pub fn insert(&self, record: ApplicantRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => guard.push(record),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_assigns_positional_ids_and_keeps_order() {
        let repository = InMemoryApplicationRepository::from_json_str(
            r#"[
                {"id": "b", "firstName": "Second"},
                {"firstName": "Unnamed"},
                {"id": "a", "firstName": "Third"}
            ]"#,
        )
        .expect("fixture loads");

        let records = repository.list().await.expect("list succeeds");
        let ids: Vec<&str> = records.iter().map(|record| record.id.0.as_str()).collect();
        assert_eq!(ids, ["b", "fixture-0002", "a"]);

        let fetched = repository
            .fetch(&ApplicationId("a".to_string()))
            .await
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(fetched.first_name, "Third");
    }

    #[test]
    fn malformed_fixture_reports_document() {
        let err = InMemoryApplicationRepository::from_json_str(r#"[{"marks": "A+"}]"#)
            .expect_err("marks must be a map");
        match err {
            RepositoryError::InvalidDocument { id, .. } => assert_eq!(id, "fixture-0001"),
            other => panic!("expected invalid document, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn insert_replaces_existing_ids() {
        let repository = InMemoryApplicationRepository::default();
        let mut record = ApplicantRecord {
            id: ApplicationId("app-1".to_string()),
            first_name: "Before".to_string(),
            ..ApplicantRecord::default()
        };
        repository.insert(record.clone()).expect("insert");
        record.first_name = "After".to_string();
        repository.insert(record).expect("replace");

        assert_eq!(repository.len(), 1);
        let records = repository.list().await.expect("list");
        assert_eq!(records[0].first_name, "After");
    }
}
