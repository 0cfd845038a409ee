use std::sync::Arc;

use chrono::NaiveDate;

use super::audit::{audit_generated_ids, summarize, CategorySummary, IdAudit};
use super::domain::{ApplicantRecord, ApplicationId, CategoryFilter};
use super::export::{export_csv, CsvExport};
use super::form::AdmissionForm;
use super::ranking::{rank_applications, RankedApplication};
use super::repository::{ApplicationRepository, RepositoryError};
use super::scoring::{ScoringEngine, ScoringPolicy, XiiMaximum};
use super::views::ApplicationDetailView;

/// Service composing the application store with the scoring engine for every dashboard surface.
pub struct AdmissionService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
    id_prefix: String,
}

impl<R> AdmissionService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: ScoringPolicy, id_prefix: impl Into<String>) -> Self {
        if let XiiMaximum::Fixed(maximum) = policy.xii_maximum {
            tracing::warn!(
                maximum,
                "XII eligibility uses a fixed maximum instead of the declared total"
            );
        }

        Self {
            repository,
            engine: Arc::new(ScoringEngine::new(policy)),
            id_prefix: id_prefix.into(),
        }
    }

    /// Ranked list for one category tab, or the unsorted full list.
    pub async fn ranking(
        &self,
        filter: CategoryFilter,
    ) -> Result<Vec<RankedApplication>, AdmissionServiceError> {
        let records = self.repository.list().await?;
        let ranked = rank_applications(records, filter, &self.engine);
        tracing::debug!(filter = %filter, count = ranked.len(), "ranked applications");
        Ok(ranked)
    }

    pub async fn export(
        &self,
        filter: CategoryFilter,
        date: NaiveDate,
    ) -> Result<CsvExport, AdmissionServiceError> {
        let ranked = self.ranking(filter).await?;
        if ranked.is_empty() {
            return Err(AdmissionServiceError::NothingToExport(filter));
        }

        let export = export_csv(&ranked, filter, date)?;
        tracing::info!(
            filter = %filter,
            rows = export.rows,
            filename = %export.filename,
            "exported applications"
        );
        Ok(export)
    }

    pub async fn detail(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationDetailView, AdmissionServiceError> {
        let record = self.find(id).await?;
        let result = self.engine.score(&record);
        Ok(ApplicationDetailView::new(&record, result))
    }

    pub async fn admission_form(
        &self,
        id: &ApplicationId,
        generated_on: NaiveDate,
    ) -> Result<AdmissionForm, AdmissionServiceError> {
        let record = self.find(id).await?;
        let result = self.engine.score(&record);
        Ok(AdmissionForm::build(&record, &result, generated_on))
    }

    pub async fn summary(&self) -> Result<CategorySummary, AdmissionServiceError> {
        let records = self.repository.list().await?;
        Ok(summarize(&records))
    }

    pub async fn audit(&self) -> Result<IdAudit, AdmissionServiceError> {
        let records = self.repository.list().await?;
        Ok(audit_generated_ids(&records, &self.id_prefix))
    }

    async fn find(&self, id: &ApplicationId) -> Result<ApplicantRecord, AdmissionServiceError> {
        self.repository
            .fetch(id)
            .await?
            .ok_or_else(|| AdmissionServiceError::NotFound(id.clone()))
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("application '{0}' not found")]
    NotFound(ApplicationId),
    #[error("no applications to export for '{0}'")]
    NothingToExport(CategoryFilter),
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
}
