use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::applications::domain::{AdmissionCategory, ApplicantRecord, ApplicationId, GuardianInfo};
use crate::applications::memory::InMemoryApplicationRepository;
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::{admission_router, AdmissionService, ScoringPolicy};

pub(super) fn marks(entries: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    entries
        .iter()
        .map(|(subject, mark)| (subject.to_string(), mark.to_string()))
        .collect()
}

pub(super) fn x_record(
    id: &str,
    category: AdmissionCategory,
    entries: &[(&str, &str)],
) -> ApplicantRecord {
    ApplicantRecord {
        id: ApplicationId(id.to_string()),
        course: "X".to_string(),
        category,
        first_name: id.to_string(),
        last_name: "Applicant".to_string(),
        email: format!("{id}@example.com"),
        marks: marks(entries),
        ..ApplicantRecord::default()
    }
}

pub(super) fn xii_record(
    id: &str,
    obtained: &[(&str, &str)],
    declared_max: &str,
) -> ApplicantRecord {
    ApplicantRecord {
        id: ApplicationId(id.to_string()),
        course: "XII".to_string(),
        category: AdmissionCategory::ManagementMeritLateralEntry,
        first_name: id.to_string(),
        marks: marks(obtained),
        total_of_max_marks: Some(declared_max.to_string()),
        ..ApplicantRecord::default()
    }
}

pub(super) fn iti_record(
    id: &str,
    obtained: &[(&str, &str)],
    declared_max: &str,
) -> ApplicantRecord {
    ApplicantRecord {
        id: ApplicationId(id.to_string()),
        course: "ITI".to_string(),
        category: AdmissionCategory::ManagementQuotaLateralEntry,
        first_name: id.to_string(),
        marks: marks(obtained),
        total_of_max_marks: Some(declared_max.to_string()),
        ..ApplicantRecord::default()
    }
}

/// Small merit-regular cohort plus one quota applicant, in store order.
pub(super) fn cohort() -> Vec<ApplicantRecord> {
    let merit = AdmissionCategory::ManagementMeritRegular;
    let mut strong = x_record(
        "app-strong",
        merit,
        &[("mathematics", "A+"), ("physics", "A+"), ("socialScience", "A")],
    );
    strong.generated_id = "CRML-2025-00002".to_string();
    strong.guardian = GuardianInfo {
        name: "Joseph \"Joe\" Varghese".to_string(),
        occupation: "Farmer".to_string(),
        relationship: "Father".to_string(),
        monthly_income: "12000".to_string(),
        phone_number: "9400000000".to_string(),
        ..GuardianInfo::default()
    };

    let mut weak = x_record("app-weak", merit, &[("mathematics", "C"), ("hindi", "B")]);
    weak.generated_id = "CRML-2025-00001".to_string();

    let mut quota = x_record(
        "app-quota",
        AdmissionCategory::ManagementQuotaRegular,
        &[("english", "A")],
    );
    quota.generated_id = "CRML-2025-00004".to_string();

    vec![weak, strong, quota]
}

pub(super) fn build_service() -> (
    AdmissionService<InMemoryApplicationRepository>,
    Arc<InMemoryApplicationRepository>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::with_records(cohort()));
    let service = AdmissionService::new(repository.clone(), ScoringPolicy::default(), "CRML-2025");
    (service, repository)
}

pub(super) fn router_with_service(
    service: AdmissionService<InMemoryApplicationRepository>,
) -> axum::Router {
    admission_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ApplicationRepository for UnavailableRepository {
    async fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }
}

pub(super) struct FlakyUpstreamRepository;

#[async_trait]
impl ApplicationRepository for FlakyUpstreamRepository {
    async fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Transport("503 from upstream".to_string()))
    }

    async fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Transport("503 from upstream".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
