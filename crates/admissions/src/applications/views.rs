use serde::Serialize;

use super::domain::{AdmissionCategory, ApplicantRecord, ApplicationId};
use super::ranking::RankedApplication;
use super::scoring::ScoreResult;

/// Row of the ranking list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub application_id: ApplicationId,
    pub generated_id: String,
    pub full_name: String,
    pub course: String,
    pub email: String,
    pub category: AdmissionCategory,
    pub score_label: &'static str,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl From<&RankedApplication> for RankingEntry {
    fn from(entry: &RankedApplication) -> Self {
        let record = &entry.record;
        Self {
            rank: entry.rank,
            application_id: record.id.clone(),
            generated_id: record.generated_id.clone(),
            full_name: record.full_name(),
            course: record.course.clone(),
            email: record.email.clone(),
            category: record.category,
            score_label: entry.result.course_type.score_label(),
            result: entry.result.clone(),
        }
    }
}

/// Single-application view: identity plus the inline score and eligibility verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailView {
    pub application_id: ApplicationId,
    pub generated_id: String,
    pub full_name: String,
    pub email: String,
    pub course: String,
    pub category: AdmissionCategory,
    pub category_title: &'static str,
    pub score_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl ApplicationDetailView {
    pub fn new(record: &ApplicantRecord, result: ScoreResult) -> Self {
        Self {
            application_id: record.id.clone(),
            generated_id: record.generated_id.clone(),
            full_name: record.full_name(),
            email: record.email.clone(),
            course: record.course.clone(),
            category: record.category,
            category_title: record.category.title(),
            score_label: result.course_type.score_label(),
            certificate_url: Some(record.certificate_url.clone()).filter(|url| !url.is_empty()),
            result,
        }
    }
}
