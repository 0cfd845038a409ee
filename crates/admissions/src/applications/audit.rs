//! Dashboard counters and the generated-id audit administrators run before publishing ranks.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::domain::{AdmissionCategory, ApplicantRecord, ApplicationId};

/// Upper bound on listed gaps; a stray huge suffix would otherwise expand into millions of ids.
const MAX_LISTED_MISSING: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: AdmissionCategory,
    pub title: &'static str,
    pub count: usize,
}

/// Totals shown on the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
    pub uncategorized: usize,
}

pub fn summarize(records: &[ApplicantRecord]) -> CategorySummary {
    let mut counts: BTreeMap<AdmissionCategory, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category).or_default() += 1;
    }

    let categories = AdmissionCategory::RANKED
        .iter()
        .map(|category| CategoryCount {
            category: *category,
            title: category.title(),
            count: counts.get(category).copied().unwrap_or(0),
        })
        .collect();

    CategorySummary {
        total: records.len(),
        categories,
        uncategorized: counts
            .get(&AdmissionCategory::Unspecified)
            .copied()
            .unwrap_or(0),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub application_id: ApplicationId,
    pub generated_id: String,
    pub sequence: u64,
    pub full_name: String,
    pub duplicate: bool,
}

/// Applications ordered by id sequence, with duplicated and skipped ids called out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAudit {
    pub entries: Vec<AuditEntry>,
    pub duplicates: Vec<String>,
    pub missing: Vec<String>,
    pub missing_truncated: bool,
}

pub fn audit_generated_ids(records: &[ApplicantRecord], prefix: &str) -> IdAudit {
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *occurrences.entry(record.generated_id.as_str()).or_default() += 1;
    }
    let duplicates: Vec<String> = occurrences
        .iter()
        .filter(|(id, count)| !id.is_empty() && **count > 1)
        .map(|(id, _)| id.to_string())
        .collect();

    let mut entries: Vec<AuditEntry> = records
        .iter()
        .map(|record| AuditEntry {
            application_id: record.id.clone(),
            generated_id: record.generated_id.clone(),
            sequence: sequence_number(&record.generated_id),
            full_name: record.full_name(),
            duplicate: duplicates.contains(&record.generated_id),
        })
        .collect();
    entries.sort_by_key(|entry| entry.sequence);

    let known: HashSet<&str> = records
        .iter()
        .map(|record| record.generated_id.as_str())
        .collect();
    let numbered = entries.iter().map(|entry| entry.sequence).filter(|n| *n > 0);
    let bounds = numbered.clone().min().zip(numbered.max());

    let mut missing = Vec::new();
    let mut missing_truncated = false;
    if let Some((low, high)) = bounds {
        for sequence in low..=high {
            let expected = format!("{prefix}-{sequence:05}");
            if known.contains(expected.as_str()) {
                continue;
            }
            if missing.len() == MAX_LISTED_MISSING {
                missing_truncated = true;
                break;
            }
            missing.push(expected);
        }
    }

    if !duplicates.is_empty() || !missing.is_empty() {
        tracing::warn!(
            duplicates = duplicates.len(),
            missing = missing.len(),
            "generated id audit found irregularities"
        );
    }

    IdAudit {
        entries,
        duplicates,
        missing,
        missing_truncated,
    }
}

/// Trailing `-<digits>` of a generated id, `0` when absent.
pub fn sequence_number(generated_id: &str) -> u64 {
    generated_id
        .rsplit_once('-')
        .map(|(_, digits)| digits)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
