use admissions::applications::{
    AdmissionService, ApplicantRecord, ApplicationId, ApplicationRepository, FirestoreRepository,
    InMemoryApplicationRepository, RepositoryError, ScoringPolicy,
};
use admissions::config::{AppConfig, StoreConfig};
use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected at startup from `ADMISSIONS_STORE`.
pub(crate) enum AdmissionStore {
    Memory(InMemoryApplicationRepository),
    Firestore(FirestoreRepository),
}

impl AdmissionStore {
    /// Build the configured store. A fixture path given on the command line forces the
    /// in-memory store.
    pub(crate) fn from_config(
        store: &StoreConfig,
        fixture_override: Option<PathBuf>,
    ) -> Result<Self, RepositoryError> {
        if let Some(path) = fixture_override {
            return load_fixture(Some(path));
        }

        match store {
            StoreConfig::Memory { fixture } => load_fixture(fixture.clone()),
            StoreConfig::Firestore(firestore) => {
                info!(
                    project = %firestore.project_id,
                    collection = %firestore.collection,
                    "using firestore application store"
                );
                Ok(Self::Firestore(FirestoreRepository::new(firestore.clone())?))
            }
        }
    }
}

fn load_fixture(path: Option<PathBuf>) -> Result<AdmissionStore, RepositoryError> {
    let repository = match path {
        Some(path) => {
            let repository = InMemoryApplicationRepository::from_json_path(&path)?;
            info!(
                fixture = %path.display(),
                applications = repository.len(),
                "loaded application fixture"
            );
            repository
        }
        None => InMemoryApplicationRepository::default(),
    };
    Ok(AdmissionStore::Memory(repository))
}

#[async_trait]
impl ApplicationRepository for AdmissionStore {
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        match self {
            AdmissionStore::Memory(store) => store.fetch(id).await,
            AdmissionStore::Firestore(store) => store.fetch(id).await,
        }
    }

    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        match self {
            AdmissionStore::Memory(store) => store.list().await,
            AdmissionStore::Firestore(store) => store.list().await,
        }
    }
}

pub(crate) fn build_service(
    config: &AppConfig,
    fixture_override: Option<PathBuf>,
) -> Result<AdmissionService<AdmissionStore>, RepositoryError> {
    let store = AdmissionStore::from_config(&config.store, fixture_override)?;
    let policy = ScoringPolicy::default().with_xii_maximum(config.scoring.xii_maximum);
    Ok(AdmissionService::new(
        Arc::new(store),
        policy,
        config.scoring.id_prefix.clone(),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2025-06-03 "),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 3).expect("valid date"))
        );
        assert!(parse_date("03.06.2025").is_err());
    }

    #[tokio::test]
    async fn memory_store_without_fixture_is_empty() {
        let store = AdmissionStore::from_config(&StoreConfig::Memory { fixture: None }, None)
            .expect("store builds");

        assert!(store.list().await.expect("list").is_empty());
    }

    #[test]
    fn missing_fixture_is_reported() {
        let result = AdmissionStore::from_config(
            &StoreConfig::Memory { fixture: None },
            Some(PathBuf::from("does/not/exist.json")),
        );

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }
}
