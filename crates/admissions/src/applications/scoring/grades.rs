/// Letter grades issued by state and CBSE boards mapped to grade points.
const GRADE_POINTS: [(&str, u8); 18] = [
    ("A+", 9),
    ("A1", 9),
    ("A", 8),
    ("A2", 8),
    ("B+", 7),
    ("B1", 7),
    ("B", 6),
    ("B2", 6),
    ("C+", 5),
    ("C1", 5),
    ("C", 4),
    ("C2", 4),
    ("D+", 3),
    ("D1", 3),
    ("D", 2),
    ("D2", 2),
    ("E", 1),
    ("E1", 1),
];

/// Convert a mark to a grade point in `0..=9`.
///
/// Exact letter-grade matches win. Otherwise the mark is read as a percentage and bucketed
/// by tens, with no upper bound (`105` is still a 9). Anything unreadable is worth 0.
pub(crate) fn grade_point(mark: &str) -> u8 {
    if let Some((_, point)) = GRADE_POINTS.iter().find(|(grade, _)| *grade == mark) {
        return *point;
    }

    match parse_mark(mark) {
        Some(value) if value >= 90.0 => 9,
        Some(value) if value >= 80.0 => 8,
        Some(value) if value >= 70.0 => 7,
        Some(value) if value >= 60.0 => 6,
        Some(value) if value >= 50.0 => 5,
        Some(value) if value >= 40.0 => 4,
        Some(value) if value >= 30.0 => 3,
        Some(value) if value >= 20.0 => 2,
        Some(_) => 1,
        None => 0,
    }
}

/// Numeric value of a mark, or 0 when it cannot be read.
pub(crate) fn numeric_mark(mark: &str) -> f64 {
    parse_mark(mark).unwrap_or(0.0)
}

/// Lenient float parse: skips leading whitespace and reads the longest numeric prefix, so
/// `"85/100"` reads as 85 and `"N/A"` reads as nothing.
pub(crate) fn parse_mark(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()]
            .replace("Infinity", "inf")
            .parse()
            .ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_grades_map_exactly() {
        assert_eq!(grade_point("A+"), 9);
        assert_eq!(grade_point("A2"), 8);
        assert_eq!(grade_point("B"), 6);
        assert_eq!(grade_point("C+"), 5);
        assert_eq!(grade_point("E1"), 1);
        assert_eq!(grade_point("a+"), 0);
    }

    #[test]
    fn numeric_marks_bucket_by_tens() {
        assert_eq!(grade_point("85"), 8);
        assert_eq!(grade_point("90"), 9);
        assert_eq!(grade_point("105"), 9);
        assert_eq!(grade_point("19.5"), 1);
        assert_eq!(grade_point("-4"), 1);
        assert_eq!(grade_point("N/A"), 0);
        assert_eq!(grade_point(""), 0);
    }

    #[test]
    fn parse_reads_leading_numeric_prefix() {
        assert_eq!(parse_mark(" 85"), Some(85.0));
        assert_eq!(parse_mark("85/100"), Some(85.0));
        assert_eq!(parse_mark(".5"), Some(0.5));
        assert_eq!(parse_mark("7."), Some(7.0));
        assert_eq!(parse_mark("1e2"), Some(100.0));
        assert_eq!(parse_mark("3e"), Some(3.0));
        assert_eq!(parse_mark("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_mark("."), None);
        assert_eq!(parse_mark("N/A"), None);
        assert_eq!(numeric_mark("absent"), 0.0);
    }
}
