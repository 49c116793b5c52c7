use chrono::{Duration, NaiveDate};

use crate::error::{AppError, AppResult};

/// Parse a calendar-day identifier in canonical `YYYY-MM-DD` form.
///
/// The shape is checked strictly (zero-padded, digits only) before chrono
/// validates the actual calendar day, so `2024-2-9`, `2024/02/09` and
/// `2024-02-30` are all rejected rather than producing a wrong day.
pub fn parse_day(s: &str) -> AppResult<NaiveDate> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    if !shape_ok {
        return Err(AppError::InvalidDateFormat(format!(
            "expected YYYY-MM-DD, got {s:?}"
        )));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDateFormat(format!("not a real calendar day: {s:?}")))
}

/// Canonical zero-padded `YYYY-MM-DD` form. Lexical order on these strings
/// matches chronological order.
pub fn day_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Every calendar day in [start, end] inclusive, ascending. Empty when
/// start > end.
pub fn range_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut d = start;
    while d <= end {
        days.push(d);
        d += Duration::days(1);
    }
    days
}

/// The `n` consecutive days ending at `today` inclusive, ascending.
pub fn trailing_window(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    if n == 0 {
        return Vec::new();
    }
    let start = today - Duration::days(i64::from(n) - 1);
    range_inclusive(start, today)
}

/// The `n` consecutive days strictly after `today`, ascending.
pub fn forward_window(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    if n == 0 {
        return Vec::new();
    }
    let start = today + Duration::days(1);
    range_inclusive(start, today + Duration::days(i64::from(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn parses_canonical_form_only() {
        assert_eq!(day_str(d("2025-01-02")), "2025-01-02");
        for bad in [
            "2025-1-02",
            "2025-01-2",
            "20250102",
            "2025/01/02",
            "2025-01-02T00:00:00Z",
            "yyyy-mm-dd",
            "",
        ] {
            assert!(
                matches!(parse_day(bad), Err(AppError::InvalidDateFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_impossible_calendar_days() {
        assert!(parse_day("2024-02-29").is_ok());
        assert!(matches!(
            parse_day("2023-02-29"),
            Err(AppError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_day("2024-13-01"),
            Err(AppError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            parse_day("2024-04-31"),
            Err(AppError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn range_crosses_leap_february_and_month_boundary() {
        let days = range_inclusive(d("2024-02-27"), d("2024-03-02"));
        let strs: Vec<String> = days.into_iter().map(day_str).collect();
        assert_eq!(
            strs,
            vec![
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02"
            ]
        );
    }

    #[test]
    fn range_crosses_year_boundary() {
        let days = range_inclusive(d("2024-12-30"), d("2025-01-02"));
        assert_eq!(days.len(), 4);
        assert_eq!(day_str(days[0]), "2024-12-30");
        assert_eq!(day_str(days[3]), "2025-01-02");
    }

    #[test]
    fn range_is_strictly_ascending_without_duplicates() {
        let days = range_inclusive(d("2025-06-01"), d("2025-06-30"));
        assert_eq!(days.len(), 30);
        for pair in days.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(range_inclusive(d("2025-06-02"), d("2025-06-01")).is_empty());
    }

    #[test]
    fn lexical_order_matches_chronological_order() {
        let days = range_inclusive(d("1999-12-28"), d("2000-01-03"));
        let strs: Vec<String> = days.iter().copied().map(day_str).collect();
        let mut sorted = strs.clone();
        sorted.sort();
        assert_eq!(strs, sorted);
    }

    #[test]
    fn trailing_window_ends_at_today() {
        let w = trailing_window(d("2025-03-01"), 4);
        let strs: Vec<String> = w.into_iter().map(day_str).collect();
        assert_eq!(
            strs,
            vec!["2025-02-26", "2025-02-27", "2025-02-28", "2025-03-01"]
        );
        assert!(trailing_window(d("2025-03-01"), 0).is_empty());
    }

    #[test]
    fn forward_window_starts_tomorrow() {
        let w = forward_window(d("2025-01-01"), 3);
        let strs: Vec<String> = w.into_iter().map(day_str).collect();
        assert_eq!(strs, vec!["2025-01-02", "2025-01-03", "2025-01-04"]);
    }
}
