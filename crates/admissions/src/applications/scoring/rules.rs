use super::super::domain::{ApplicantRecord, CourseFamily};
use super::config::{ScoringPolicy, XiiMaximum};
use super::grades::{grade_point, numeric_mark};
use super::ScoreResult;

pub(crate) fn score_xii(record: &ApplicantRecord, policy: &ScoringPolicy) -> ScoreResult {
    let has_core_subjects = policy.xii_required_subjects.iter().all(|required| {
        record
            .marks
            .keys()
            .any(|subject| subject.trim().to_lowercase() == *required)
    });

    if !has_core_subjects {
        return ScoreResult {
            score: 0.0,
            course_type: CourseFamily::Xii,
            percentage: None,
            is_eligible: Some(false),
            reason: Some("Missing core subjects".to_string()),
        };
    }

    let obtained = total_marks(record);
    let declared_max = declared_maximum(record);
    let denominator = match policy.xii_maximum {
        XiiMaximum::Declared => declared_max,
        XiiMaximum::Fixed(maximum) => maximum,
    };

    let is_eligible = obtained >= denominator * policy.pass_fraction;
    let reason = if is_eligible {
        "Eligible".to_string()
    } else {
        let required_percent = policy.pass_fraction * 100.0;
        format!("Marks below {required_percent}% requirement ({obtained}/{declared_max})")
    };

    ScoreResult {
        score: obtained,
        course_type: CourseFamily::Xii,
        percentage: percentage_of(obtained, denominator),
        is_eligible: Some(is_eligible),
        reason: Some(reason),
    }
}

pub(crate) fn score_iti(record: &ApplicantRecord, policy: &ScoringPolicy) -> ScoreResult {
    let obtained = total_marks(record);
    let max_marks = declared_maximum(record);
    let percentage = percentage_of(obtained, max_marks);

    let is_eligible = obtained >= max_marks * policy.pass_fraction;
    let reason = match (is_eligible, percentage) {
        (true, _) => "Eligible".to_string(),
        (false, Some(percentage)) => {
            format!("Not Eligible ({obtained}/{max_marks} = {percentage:.2}%)")
        }
        (false, None) => format!("Not Eligible ({obtained}/{max_marks})"),
    };

    ScoreResult {
        score: obtained,
        course_type: CourseFamily::Iti,
        percentage,
        is_eligible: Some(is_eligible),
        reason: Some(reason),
    }
}

pub(crate) fn score_x(record: &ApplicantRecord, policy: &ScoringPolicy) -> ScoreResult {
    let mut core_points = Vec::new();
    let mut other_points = Vec::new();

    for (subject, mark) in &record.marks {
        let point = f64::from(grade_point(mark));
        let sanitized = subject.trim().to_lowercase();
        if policy.x_core_subjects.contains(&sanitized) {
            core_points.push(point);
        } else {
            other_points.push(point);
        }
    }

    let core_avg = mean(&core_points) * policy.x_core_weight;
    let other_avg = mean(&other_points) * policy.x_other_weight;

    ScoreResult {
        score: round_to_ten_places(core_avg + other_avg),
        course_type: CourseFamily::X,
        percentage: None,
        is_eligible: None,
        reason: None,
    }
}

fn total_marks(record: &ApplicantRecord) -> f64 {
    record.marks.values().map(|mark| numeric_mark(mark)).sum()
}

fn declared_maximum(record: &ApplicantRecord) -> f64 {
    record
        .total_of_max_marks
        .as_deref()
        .map(numeric_mark)
        .unwrap_or(0.0)
}

fn percentage_of(obtained: f64, maximum: f64) -> Option<f64> {
    if maximum == 0.0 {
        return None;
    }
    Some(obtained / maximum * 100.0).filter(|value| value.is_finite())
}

fn mean(points: &[f64]) -> f64 {
    if points.is_empty() {
        0.0
    } else {
        points.iter().sum::<f64>() / points.len() as f64
    }
}

fn round_to_ten_places(value: f64) -> f64 {
    (value * 1e10).round() / 1e10
}
