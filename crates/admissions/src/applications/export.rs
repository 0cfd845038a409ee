use std::collections::HashSet;

use chrono::NaiveDate;

use super::domain::CategoryFilter;
use super::ranking::RankedApplication;

const FIXED_HEADERS: [&str; 12] = [
    "Rank",
    "Full Name",
    "Course",
    "Email",
    "Index Score",
    "Status",
    "Percentage",
    "Guardian Name",
    "Guardian Occupation",
    "Guardian Relationship",
    "Guardian Monthly Income",
    "Guardian Phone Number",
];

/// Rendered CSV sheet ready to be served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub rows: usize,
    pub content: String,
}

/// `{category}_applications_{YYYY-MM-DD}.csv`
pub fn export_filename(filter: CategoryFilter, date: NaiveDate) -> String {
    format!("{}_applications_{}.csv", filter.slug(), date.format("%Y-%m-%d"))
}

/// Build the ranking sheet. Every field is quoted; one trailing column per subject seen in
/// the selection, in first-seen order.
pub fn export_csv(
    ranked: &[RankedApplication],
    filter: CategoryFilter,
    date: NaiveDate,
) -> Result<CsvExport, csv::Error> {
    let subjects = subject_columns(ranked);

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let headers = FIXED_HEADERS
        .iter()
        .map(|header| header.to_string())
        .chain(subjects.iter().map(|subject| prettify_subject(subject)));
    writer.write_record(headers)?;

    for entry in ranked {
        let record = &entry.record;
        let guardian = &record.guardian;
        let fixed = [
            entry.rank.to_string(),
            record.full_name(),
            record.course.clone(),
            record.email.clone(),
            entry.result.score.to_string(),
            entry.result.reason.clone().unwrap_or_default(),
            entry.result.percentage_label().unwrap_or_default(),
            guardian.name.clone(),
            guardian.occupation.clone(),
            guardian.relationship.clone(),
            guardian.monthly_income.clone(),
            guardian.phone_number.clone(),
        ];
        let marks = subjects
            .iter()
            .map(|subject| record.marks.get(*subject).cloned().unwrap_or_default());

        writer.write_record(fixed.into_iter().chain(marks))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;

    Ok(CsvExport {
        filename: export_filename(filter, date),
        rows: ranked.len(),
        content: String::from_utf8_lossy(&data).into_owned(),
    })
}

fn subject_columns(ranked: &[RankedApplication]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ranked
        .iter()
        .flat_map(|entry| entry.record.marks.keys())
        .filter(|subject| seen.insert(subject.as_str()))
        .map(String::as_str)
        .collect()
}

/// `socialScience` becomes `Social Science`.
pub(crate) fn prettify_subject(subject: &str) -> String {
    let mut spaced = String::with_capacity(subject.len() + 4);
    for ch in subject.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prettifies_camel_case_subjects() {
        assert_eq!(prettify_subject("socialScience"), "Social Science");
        assert_eq!(prettify_subject("firstLanguagePaperI"), "First Language Paper I");
        assert_eq!(prettify_subject("English"), "English");
        assert_eq!(prettify_subject("mathematics"), "Mathematics");
        assert_eq!(prettify_subject(""), "");
    }

    #[test]
    fn filename_uses_category_slug_and_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).expect("valid date");
        assert_eq!(
            export_filename(CategoryFilter::All, date),
            "all_applications_2025-06-03.csv"
        );
    }
}
