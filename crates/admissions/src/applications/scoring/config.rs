use serde::{Deserialize, Serialize};

/// Denominator used for the XII eligibility threshold and percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "basis", content = "value")]
pub enum XiiMaximum {
    /// The applicant's declared `totalofMaxMarks`.
    Declared,
    /// A fixed maximum regardless of what the applicant declared (legacy ranking view used 1200).
    Fixed(f64),
}

impl Default for XiiMaximum {
    fn default() -> Self {
        XiiMaximum::Declared
    }
}

/// Weights, thresholds and subject lists applied by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub xii_maximum: XiiMaximum,
    pub pass_fraction: f64,
    pub xii_required_subjects: Vec<String>,
    pub x_core_subjects: Vec<String>,
    pub x_core_weight: f64,
    pub x_other_weight: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            xii_maximum: XiiMaximum::Declared,
            pass_fraction: 0.5,
            xii_required_subjects: ["mathematics", "physics", "chemistry"]
                .map(String::from)
                .to_vec(),
            x_core_subjects: ["mathematics", "physics", "chemistry", "science", "english"]
                .map(String::from)
                .to_vec(),
            x_core_weight: 0.85,
            x_other_weight: 0.15,
        }
    }
}

impl ScoringPolicy {
    pub fn with_xii_maximum(mut self, xii_maximum: XiiMaximum) -> Self {
        self.xii_maximum = xii_maximum;
        self
    }
}
