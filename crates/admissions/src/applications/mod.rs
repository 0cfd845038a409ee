//! Admission applications: merit scoring, category rankings, CSV exports, printable forms and
//! the generated-id audit.
//!
//! Every surface scores through the same [`ScoringEngine`], so a ranking row, an exported sheet
//! and a printed form for one applicant always agree.

pub mod audit;
pub mod domain;
pub mod export;
pub mod firestore;
pub mod form;
pub mod memory;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use audit::{
    audit_generated_ids, sequence_number, summarize, AuditEntry, CategoryCount, CategorySummary,
    IdAudit,
};
pub use domain::{
    AdmissionCategory, ApplicantRecord, ApplicationId, CategoryFilter, CourseFamily,
    GuardianInfo, UnknownCategory,
};
pub use export::{export_csv, export_filename, CsvExport};
pub use firestore::FirestoreRepository;
pub use form::AdmissionForm;
pub use memory::InMemoryApplicationRepository;
pub use ranking::{rank_applications, RankedApplication};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::admission_router;
pub use scoring::{compute_index_score, ScoreResult, ScoringEngine, ScoringPolicy, XiiMaximum};
pub use service::{AdmissionService, AdmissionServiceError};
pub use views::{ApplicationDetailView, RankingEntry};
