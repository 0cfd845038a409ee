use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for stored applications (the document id in the store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Admission quota the applicant applied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionCategory {
    ManagementMeritRegular,
    ManagementQuotaRegular,
    ManagementMeritLateralEntry,
    ManagementQuotaLateralEntry,
    #[serde(other)]
    Unspecified,
}

impl AdmissionCategory {
    /// Categories shown as ranking tabs, in display order.
    pub const RANKED: [AdmissionCategory; 4] = [
        AdmissionCategory::ManagementMeritRegular,
        AdmissionCategory::ManagementQuotaRegular,
        AdmissionCategory::ManagementMeritLateralEntry,
        AdmissionCategory::ManagementQuotaLateralEntry,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            AdmissionCategory::ManagementMeritRegular => "management_merit_regular",
            AdmissionCategory::ManagementQuotaRegular => "management_quota_regular",
            AdmissionCategory::ManagementMeritLateralEntry => "management_merit_lateral_entry",
            AdmissionCategory::ManagementQuotaLateralEntry => "management_quota_lateral_entry",
            AdmissionCategory::Unspecified => "unspecified",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            AdmissionCategory::ManagementMeritRegular => "Management Merit - Regular",
            AdmissionCategory::ManagementQuotaRegular => "Management Quota - Regular",
            AdmissionCategory::ManagementMeritLateralEntry => "Management Merit - Lateral Entry",
            AdmissionCategory::ManagementQuotaLateralEntry => "Management Quota - Lateral Entry",
            AdmissionCategory::Unspecified => "Unspecified",
        }
    }
}

impl Default for AdmissionCategory {
    fn default() -> Self {
        AdmissionCategory::Unspecified
    }
}

impl fmt::Display for AdmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Selection applied by ranking and export surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(AdmissionCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: AdmissionCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(expected) => expected == category,
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.slug(),
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::Only(AdmissionCategory::ManagementMeritRegular)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category filter '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        if value == "all" {
            return Ok(CategoryFilter::All);
        }

        AdmissionCategory::RANKED
            .into_iter()
            .find(|category| category.slug() == value)
            .map(CategoryFilter::Only)
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

/// Qualifying examination family driving which scoring model applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseFamily {
    X,
    #[serde(rename = "XII")]
    Xii,
    #[serde(rename = "ITI")]
    Iti,
}

impl CourseFamily {
    /// Case-insensitive substring classification, checked as XII, then ITI, then X.
    pub fn classify(course: &str) -> Self {
        let folded = course.to_lowercase();
        if folded.contains("xii") {
            CourseFamily::Xii
        } else if folded.contains("iti") {
            CourseFamily::Iti
        } else {
            CourseFamily::X
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CourseFamily::X => "X",
            CourseFamily::Xii => "XII",
            CourseFamily::Iti => "ITI",
        }
    }

    /// Heading used wherever the score is displayed next to the applicant.
    pub const fn score_label(self) -> &'static str {
        match self {
            CourseFamily::X => "Index Score",
            CourseFamily::Xii | CourseFamily::Iti => "Score",
        }
    }
}

impl fmt::Display for CourseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Guardian details captured on the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub relationship: String,
    #[serde(deserialize_with = "lenient_string")]
    pub monthly_income: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address_line_one: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address_line_two: String,
}

/// Applicant record as stored in the `admission_application` collection.
///
/// Only `course`, `marks` and `totalofMaxMarks` feed the scoring engine. Every other field is
/// passthrough data for the list, export and form views. Missing fields take their defaults
/// (empty strings, empty maps, `None`), and numeric values are accepted wherever a string is
/// expected so documents written by older form versions still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantRecord {
    pub id: ApplicationId,
    #[serde(deserialize_with = "lenient_string")]
    pub generated_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(deserialize_with = "lenient_marks")]
    pub marks: BTreeMap<String, String>,
    #[serde(rename = "totalofMaxMarks", deserialize_with = "lenient_optional_string")]
    pub total_of_max_marks: Option<String>,
    #[serde(deserialize_with = "lenient_category")]
    pub category: AdmissionCategory,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub govt_quota_application_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub fee: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_one: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_two: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_three: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_four: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_five: String,
    #[serde(deserialize_with = "lenient_string")]
    pub preference_six: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub place_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub religion: String,
    #[serde(deserialize_with = "lenient_string")]
    pub community: String,
    #[serde(deserialize_with = "lenient_string")]
    pub aadhaar_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contact_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub alternate_contact_no: String,
    #[serde(rename = "addressLine1", deserialize_with = "lenient_string")]
    pub address_line1: String,
    #[serde(rename = "addressLine2", deserialize_with = "lenient_string")]
    pub address_line2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub university_or_board: String,
    #[serde(deserialize_with = "lenient_string")]
    pub passed_on: String,
    #[serde(deserialize_with = "lenient_string")]
    pub chances_taken: String,
    #[serde(deserialize_with = "lenient_string")]
    pub transaction_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub certificate_url: String,
    #[serde(deserialize_with = "lenient_guardian")]
    pub guardian: GuardianInfo,
}

impl ApplicantRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn course_family(&self) -> CourseFamily {
        CourseFamily::classify(&self.course)
    }

    /// Branch preferences in order; blank entries are kept so positions stay stable.
    pub fn preferences(&self) -> [&str; 6] {
        [
            &self.preference_one,
            &self.preference_two,
            &self.preference_three,
            &self.preference_four,
            &self.preference_five,
            &self.preference_six,
        ]
    }
}

/// Loose scalar used while decoding documents whose field types drifted over time.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    /// Maps, arrays and anything else a field should never have held.
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(value) => value,
            Scalar::Integer(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Flag(value) => value.to_string(),
            Scalar::Other(_) => String::new(),
        }
    }
}

/// Either a well-formed `T` or a value of the wrong shape, which decodes to `T::default()`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T: Default> Lenient<T> {
    fn or_default(self) -> T {
        match self {
            Lenient::Value(value) => value,
            Lenient::Other(_) => T::default(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .filter(|value| !value.is_empty()))
}

fn lenient_marks<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Lenient::<BTreeMap<String, Option<Scalar>>>::deserialize(deserializer)?;
    Ok(raw
        .or_default()
        .into_iter()
        .map(|(subject, mark)| (subject, mark.map(Scalar::into_text).unwrap_or_default()))
        .collect())
}

fn lenient_category<'de, D>(deserializer: D) -> Result<AdmissionCategory, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Lenient::<AdmissionCategory>::deserialize(deserializer)?.or_default())
}

fn lenient_guardian<'de, D>(deserializer: D) -> Result<GuardianInfo, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Lenient::<GuardianInfo>::deserialize(deserializer)?.or_default())
}
