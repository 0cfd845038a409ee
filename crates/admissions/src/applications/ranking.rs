use std::cmp::Ordering;

use super::domain::{ApplicantRecord, CategoryFilter};
use super::scoring::{ScoreResult, ScoringEngine};

/// A scored applicant at its 1-based position in a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedApplication {
    pub rank: usize,
    pub record: ApplicantRecord,
    pub result: ScoreResult,
}

/// Score every record once and order the selection for display or export.
///
/// A single category is sorted by descending score (ties keep store order). `All` keeps the
/// store order untouched, matching the unsorted "export all" sheet admissions staff use.
pub fn rank_applications(
    records: Vec<ApplicantRecord>,
    filter: CategoryFilter,
    engine: &ScoringEngine,
) -> Vec<RankedApplication> {
    let mut scored: Vec<(ApplicantRecord, ScoreResult)> = records
        .into_iter()
        .filter(|record| filter.matches(record.category))
        .map(|record| {
            let result = engine.score(&record);
            (record, result)
        })
        .collect();

    if let CategoryFilter::Only(_) = filter {
        scored.sort_by(|(_, a), (_, b)| descending(a.score, b.score));
    }

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (record, result))| RankedApplication {
            rank: index + 1,
            record,
            result,
        })
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::domain::{AdmissionCategory, ApplicationId};

    fn record(id: &str, category: AdmissionCategory, marks: &[(&str, &str)]) -> ApplicantRecord {
        ApplicantRecord {
            id: ApplicationId(id.to_string()),
            course: "X".to_string(),
            category,
            marks: marks
                .iter()
                .map(|(subject, mark)| (subject.to_string(), mark.to_string()))
                .collect(),
            ..ApplicantRecord::default()
        }
    }

    fn ids(ranked: &[RankedApplication]) -> Vec<&str> {
        ranked.iter().map(|entry| entry.record.id.0.as_str()).collect()
    }

    #[test]
    fn category_ranking_sorts_by_descending_score() {
        let merit = AdmissionCategory::ManagementMeritRegular;
        let records = vec![
            record("low", merit, &[("english", "C")]),
            record("other", AdmissionCategory::ManagementQuotaRegular, &[("english", "A+")]),
            record("high", merit, &[("english", "A+")]),
            record("mid", merit, &[("english", "B")]),
        ];

        let ranked = rank_applications(
            records,
            CategoryFilter::Only(merit),
            &ScoringEngine::default(),
        );

        assert_eq!(ids(&ranked), ["high", "mid", "low"]);
        assert_eq!(
            ranked.iter().map(|entry| entry.rank).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[test]
    fn ties_keep_store_order() {
        let merit = AdmissionCategory::ManagementMeritRegular;
        let records = vec![
            record("first", merit, &[("english", "A")]),
            record("second", merit, &[("english", "A2")]),
        ];

        let ranked = rank_applications(
            records,
            CategoryFilter::Only(merit),
            &ScoringEngine::default(),
        );

        assert_eq!(ids(&ranked), ["first", "second"]);
    }

    #[test]
    fn all_filter_keeps_store_order() {
        let records = vec![
            record("a", AdmissionCategory::ManagementQuotaRegular, &[("english", "E")]),
            record("b", AdmissionCategory::Unspecified, &[("english", "A+")]),
        ];

        let ranked = rank_applications(records, CategoryFilter::All, &ScoringEngine::default());

        assert_eq!(ids(&ranked), ["a", "b"]);
    }
}
