//! Merit scoring shared by the ranking list, CSV export, admission form and detail view.
//!
//! Scoring never fails: unreadable marks degrade to zero so every record still produces a
//! rankable number.

mod config;
mod grades;
mod rules;

pub use config::{ScoringPolicy, XiiMaximum};

use super::domain::{ApplicantRecord, CourseFamily};
use serde::{Deserialize, Serialize};

/// Stateless scorer that applies a policy to applicant records.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn score(&self, record: &ApplicantRecord) -> ScoreResult {
        match record.course_family() {
            CourseFamily::Xii => rules::score_xii(record, &self.policy),
            CourseFamily::Iti => rules::score_iti(record, &self.policy),
            CourseFamily::X => rules::score_x(record, &self.policy),
        }
    }
}

/// Score a record with the default policy (XII measured against the declared maximum).
pub fn compute_index_score(record: &ApplicantRecord) -> ScoreResult {
    ScoringEngine::default().score(record)
}

/// Index score and eligibility verdict for one applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: f64,
    pub course_type: CourseFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_eligible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScoreResult {
    /// Percentage as shown in exports and forms, e.g. `45.00%`.
    pub fn percentage_label(&self) -> Option<String> {
        self.percentage.map(|value| format!("{value:.2}%"))
    }
}
