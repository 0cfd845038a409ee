//! Per-applicant admission form: the document administrators print, have signed and file.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{ApplicantRecord, CourseFamily};
use super::export::prettify_subject;
use super::scoring::ScoreResult;

const INSTITUTION: &str = "Carmel Polytechnic College";
const FORM_HEADING: &str = "Application for Polytechnic Admission 2024-2025";
const FOOTER: &str = "Carmel Polytechnic Admission";
const MISSING: &str = "Nill";

const SSLC_SUBJECT_ORDER: [&str; 10] = [
    "firstLanguagePaperI",
    "firstLanguagePaperII",
    "english",
    "hindi",
    "socialScience",
    "physics",
    "chemistry",
    "biology",
    "mathematics",
    "informationTechnology",
];

const CHECKLIST: [&str; 4] = [
    "I have filled-in the correct information.",
    "I have uploaded the copy of statement of marks card of class X.",
    "My parent/guardian and I have signed the declaration on the printed application form.",
    "I am attaching the copy of application processing fee challan.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub label: String,
    pub value: String,
}

impl FormField {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }

    fn or_missing(label: &str, value: &str) -> Self {
        Self::new(label, or_missing(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub number: usize,
    pub subject: String,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicHistory {
    pub course: String,
    pub institution: String,
    pub board: String,
    pub year: String,
}

/// Structured admission form; `render_text` produces the printable version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionForm {
    pub filename: String,
    pub institution: &'static str,
    pub heading: &'static str,
    pub title: String,
    pub govt_quota_application_no: String,
    pub application_number: String,
    pub score: FormField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
    pub fee: String,
    pub preferences: Vec<FormField>,
    pub candidate: Vec<FormField>,
    pub address: String,
    pub academic_history: AcademicHistory,
    pub qualifying_examination: String,
    pub chances_taken: String,
    pub subjects: Vec<SubjectRow>,
    pub guardian: Vec<FormField>,
    pub transaction_id: String,
    pub checklist: Vec<&'static str>,
    pub generated_on: NaiveDate,
}

impl AdmissionForm {
    pub fn build(record: &ApplicantRecord, result: &ScoreResult, generated_on: NaiveDate) -> Self {
        let family = result.course_type;
        let percentage = match family {
            CourseFamily::X => None,
            CourseFamily::Xii | CourseFamily::Iti => {
                Some(result.percentage_label().unwrap_or_default())
            }
        };

        let preferences = record.preferences();
        let shown = if preferences[3..].iter().any(|value| !value.is_empty()) {
            6
        } else {
            3
        };
        let preferences = preferences
            .iter()
            .take(shown)
            .enumerate()
            .map(|(index, value)| {
                FormField::or_missing(&format!("Preference {}", index + 1), value)
            })
            .collect();

        let guardian = &record.guardian;
        let guardian_address = join_lines(&guardian.address_line_one, &guardian.address_line_two);

        Self {
            filename: format!("{}_Application.txt", record.first_name),
            institution: INSTITUTION,
            heading: FORM_HEADING,
            title: record.title.clone(),
            govt_quota_application_no: if record.govt_quota_application_no.is_empty() {
                "N/A".to_string()
            } else {
                record.govt_quota_application_no.clone()
            },
            application_number: or_missing(&record.generated_id),
            score: FormField::new(family.score_label(), result.score.to_string()),
            percentage,
            fee: record.fee.clone(),
            preferences,
            candidate: vec![
                FormField::new(
                    "Name of the Applicant",
                    format!(
                        "{} {}",
                        or_missing(&record.first_name),
                        or_missing(&record.last_name)
                    ),
                ),
                FormField::or_missing("Date of Birth", &record.date_of_birth),
                FormField::or_missing("Gender", &record.gender),
                FormField::or_missing("Place of Birth", &record.place_of_birth),
                FormField::or_missing("Religion", &record.religion),
                FormField::or_missing("Community", &record.community),
                FormField::new("Email", record.email.clone()),
                FormField::or_missing("Phone Number", &record.contact_no),
                FormField::or_missing("Aadhar Number", &record.aadhaar_no),
                FormField::or_missing("Alternate Phone Number", &record.alternate_contact_no),
            ],
            address: or_missing(&join_lines(&record.address_line1, &record.address_line2)),
            academic_history: AcademicHistory {
                course: record.course.clone(),
                institution: record.institution.clone(),
                board: record.university_or_board.clone(),
                year: record.passed_on.clone(),
            },
            qualifying_examination: record.course.clone(),
            chances_taken: record.chances_taken.clone(),
            subjects: subject_rows(record),
            guardian: vec![
                FormField::new("Name of the Guardian", guardian.name.clone()),
                FormField::new("Relationship with Applicant", guardian.relationship.clone()),
                FormField::new("Occupation", guardian.occupation.clone()),
                FormField::new("Monthly Income", guardian.monthly_income.clone()),
                FormField::new("Phone Number", guardian.phone_number.clone()),
                FormField::new("Address (Residence)", or_missing(&guardian_address)),
            ],
            transaction_id: or_missing(&record.transaction_id),
            checklist: CHECKLIST.to_vec(),
            generated_on,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(72);

        let _ = writeln!(out, "{}", self.institution);
        let _ = writeln!(out, "{}", self.heading);
        if !self.title.is_empty() {
            let _ = writeln!(out, "{}", self.title);
        }
        let _ = writeln!(
            out,
            "Govt. Management Quota Application No. (www.polyadmission.org): {}",
            self.govt_quota_application_no
        );
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Application Number: {}", self.application_number);
        let _ = writeln!(out, "{}: {}", self.score.label, self.score.value);
        if let Some(percentage) = &self.percentage {
            let _ = writeln!(out, "Percentage: {percentage}");
        }
        let _ = writeln!(out, "Fees to be remitted: Rs. {}/-", self.fee);

        section(&mut out, "Branch Preference", &self.preferences);

        section(&mut out, "Candidate Profile", &self.candidate);
        let _ = writeln!(out, "  Address: {}", self.address);

        let _ = writeln!(out, "\nAcademic History");
        let history = &self.academic_history;
        let _ = writeln!(
            out,
            "  Course: {} | Institution: {} | Board: {} | Year: {}",
            history.course, history.institution, history.board, history.year
        );

        let _ = writeln!(
            out,
            "\nQualifying Examination: {} (chances taken: {})",
            self.qualifying_examination, self.chances_taken
        );
        for row in &self.subjects {
            let _ = writeln!(out, "  {:>2}. {:<40} {}", row.number, row.subject, row.grade);
        }

        section(&mut out, "Guardian Info", &self.guardian);

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "Fee payment");
        let _ = writeln!(out, "  Transaction Id: {}", self.transaction_id);

        let _ = writeln!(out, "\nChecklist for the Applicant (Yes/No)");
        for (index, item) in self.checklist.iter().enumerate() {
            let _ = writeln!(out, "  {}. {item} [   ]", index + 1);
        }

        let _ = writeln!(out, "\nPlace: _________________________");
        let _ = writeln!(out, "Date: {}", self.generated_on.format("%d.%m.%Y"));
        let _ = writeln!(out, "Signature of the Candidate: _________________________");
        let _ = writeln!(
            out,
            "\n{FOOTER} | Generated on: {}",
            self.generated_on.format("%Y-%m-%d")
        );
        out
    }
}

fn section(out: &mut String, title: &str, fields: &[FormField]) {
    let _ = writeln!(out, "\n{title}");
    for field in fields {
        let _ = writeln!(out, "  {}: {}", field.label, field.value);
    }
}

fn or_missing(value: &str) -> String {
    if value.trim().is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

fn join_lines(first: &str, second: &str) -> String {
    format!("{first} {second}").trim().to_string()
}

fn normalize_subject(subject: &str) -> String {
    subject
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// SSLC marks follow the board's standard subject order, with unlisted subjects after.
/// Other boards keep the stored order.
fn subject_rows(record: &ApplicantRecord) -> Vec<SubjectRow> {
    let is_sslc = record.university_or_board.to_lowercase() == "sslc";

    let ordered: Vec<(&String, &String)> = if is_sslc {
        let standard: Vec<String> = SSLC_SUBJECT_ORDER
            .iter()
            .map(|subject| normalize_subject(subject))
            .collect();
        let position = |subject: &str| {
            let normalized = normalize_subject(subject);
            standard
                .iter()
                .position(|known| *known == normalized)
                .unwrap_or(standard.len())
        };

        let mut entries: Vec<(&String, &String)> = record.marks.iter().collect();
        entries.sort_by_key(|(subject, _)| position(subject));
        entries
    } else {
        record.marks.iter().collect()
    };

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, (subject, grade))| SubjectRow {
            number: index + 1,
            subject: prettify_subject(subject).trim().to_string(),
            grade: grade.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::scoring::compute_index_score;

    fn sslc_record() -> ApplicantRecord {
        ApplicantRecord {
            first_name: "Anu".to_string(),
            last_name: "Mathew".to_string(),
            course: "X".to_string(),
            university_or_board: "SSLC".to_string(),
            generated_id: "CRML-2025-00012".to_string(),
            fee: "500".to_string(),
            preference_one: "Computer Engineering".to_string(),
            marks: [
                ("mathematics", "A+"),
                ("arabic", "A"),
                ("english", "B+"),
                ("Social Science", "A2"),
                ("firstLanguagePaperI", "A1"),
            ]
            .into_iter()
            .map(|(subject, mark)| (subject.to_string(), mark.to_string()))
            .collect(),
            ..ApplicantRecord::default()
        }
    }

    #[test]
    fn sslc_subjects_follow_board_order() {
        let record = sslc_record();
        let form = AdmissionForm::build(
            &record,
            &compute_index_score(&record),
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        );

        let subjects: Vec<&str> = form.subjects.iter().map(|row| row.subject.as_str()).collect();
        assert_eq!(
            subjects,
            [
                "First Language Paper I",
                "English",
                "Social  Science",
                "Mathematics",
                "Arabic"
            ]
        );
    }

    #[test]
    fn x_forms_show_index_score_without_percentage() {
        let record = sslc_record();
        let form = AdmissionForm::build(
            &record,
            &compute_index_score(&record),
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        );

        assert_eq!(form.score.label, "Index Score");
        assert!(form.percentage.is_none());
        assert_eq!(form.application_number, "CRML-2025-00012");
        assert_eq!(form.preferences.len(), 3);
        assert_eq!(form.preferences[1].value, "Nill");
        assert_eq!(form.filename, "Anu_Application.txt");

        let text = form.render_text();
        assert!(text.contains("Index Score: "));
        assert!(text.contains("Date: 01.06.2025"));
        assert!(text.contains("Fees to be remitted: Rs. 500/-"));
    }

    #[test]
    fn iti_forms_show_percentage_and_extra_preferences() {
        let record = ApplicantRecord {
            first_name: "Biju".to_string(),
            course: "ITI".to_string(),
            total_of_max_marks: Some("400".to_string()),
            preference_five: "Civil Engineering".to_string(),
            marks: [("trade".to_string(), "300".to_string())].into_iter().collect(),
            ..ApplicantRecord::default()
        };
        let form = AdmissionForm::build(
            &record,
            &compute_index_score(&record),
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        );

        assert_eq!(form.score.label, "Score");
        assert_eq!(form.score.value, "300");
        assert_eq!(form.percentage.as_deref(), Some("75.00%"));
        assert_eq!(form.preferences.len(), 6);
        assert_eq!(form.application_number, "Nill");
    }
}
