use std::fmt;

use chrono::NaiveDate;

use crate::error::FetchError;

/// A digest calendar date in the API's fixed `YYYY-MM-DD` form.
///
/// Values are constructed only through [`DigestDate::parse`], so they always
/// match the zero-padded pattern and name a real calendar date. Lexical
/// ordering equals chronological ordering because the format is fixed-width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigestDate(String);

impl DigestDate {
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        if !matches_pattern(raw) {
            return Err(FetchError::Validation(format!(
                "invalid date {raw:?}: expected YYYY-MM-DD"
            )));
        }
        if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_err() {
            return Err(FetchError::Validation(format!(
                "invalid date {raw:?}: not a calendar date"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Long display form for the UI, e.g. "Friday, May 3, 2024".
    ///
    /// Display formatting is the only place a date is treated as anything
    /// richer than its wire string.
    pub fn display_label(&self) -> String {
        match NaiveDate::parse_from_str(&self.0, "%Y-%m-%d") {
            Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
            Err(_) => self.0.clone(),
        }
    }
}

impl fmt::Display for DigestDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn matches_pattern(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0usize, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

/// Validates a raw dates payload and normalizes it into ascending,
/// deduplicated order.
///
/// Any entry failing validation rejects the whole payload; partial recovery
/// would hide upstream corruption.
pub fn normalize_dates(raw: Vec<String>) -> Result<Vec<DigestDate>, FetchError> {
    let mut dates = raw
        .iter()
        .map(|s| DigestDate::parse(s))
        .collect::<Result<Vec<_>, _>>()?;
    dates.sort();
    dates.dedup();
    Ok(dates)
}

/// Tracks the selected date within the navigable range.
///
/// Seeding selects the most recent date. Previous/next clamp at the bounds
/// and report whether they moved, so callers can disable navigation
/// controls at the edges. An empty cursor has no current date and keeps
/// both directions disabled.
#[derive(Debug, Clone, Default)]
pub struct DateCursor {
    dates: Vec<DigestDate>,
    index: Option<usize>,
}

impl DateCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cursor from a normalized (ascending, deduplicated) date
    /// list, selecting the latest entry.
    pub fn from_dates(dates: Vec<DigestDate>) -> Self {
        let index = dates.len().checked_sub(1);
        Self { dates, index }
    }

    pub fn current(&self) -> Option<&DigestDate> {
        self.index.and_then(|i| self.dates.get(i))
    }

    pub fn dates(&self) -> &[DigestDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.dates.len())
    }

    /// Steps to the previous (older) date; a no-op at the lower bound or
    /// when no dates are loaded. Returns whether the cursor moved.
    pub fn go_to_previous(&mut self) -> bool {
        if self.has_previous() {
            self.index = self.index.map(|i| i - 1);
            true
        } else {
            false
        }
    }

    /// Steps to the next (newer) date; a no-op at the upper bound or when
    /// no dates are loaded. Returns whether the cursor moved.
    pub fn go_to_next(&mut self) -> bool {
        if self.has_next() {
            self.index = self.index.map(|i| i + 1);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DigestDate {
        DigestDate::parse(s).unwrap()
    }

    mod digest_date_tests {
        use super::*;

        #[test]
        fn test_parse_valid_date() {
            let d = date("2024-05-03");
            assert_eq!(d.as_str(), "2024-05-03");
            assert_eq!(d.to_string(), "2024-05-03");
        }

        #[test]
        fn test_parse_rejects_wrong_shape() {
            for raw in [
                "",
                "2024-5-3",
                "20240503",
                "2024/05/03",
                "24-05-03",
                "2024-05-03T00:00:00",
                "not-a-date",
            ] {
                let err = DigestDate::parse(raw).unwrap_err();
                assert!(
                    matches!(err, FetchError::Validation(_)),
                    "expected Validation for {raw:?}, got {err:?}"
                );
            }
        }

        #[test]
        fn test_parse_rejects_impossible_calendar_dates() {
            for raw in ["2024-13-01", "2024-00-10", "2023-02-29", "2024-04-31"] {
                assert!(
                    matches!(DigestDate::parse(raw), Err(FetchError::Validation(_))),
                    "expected rejection for {raw:?}"
                );
            }
        }

        #[test]
        fn test_leap_day_is_valid() {
            assert!(DigestDate::parse("2024-02-29").is_ok());
        }

        #[test]
        fn test_lexical_order_is_chronological() {
            assert!(date("2024-05-02") < date("2024-05-03"));
            assert!(date("2023-12-31") < date("2024-01-01"));
        }

        #[test]
        fn test_display_label() {
            assert_eq!(date("2024-05-03").display_label(), "Friday, May 3, 2024");
        }
    }

    mod normalize_tests {
        use super::*;

        #[test]
        fn test_sorts_ascending_and_dedups() {
            let raw = vec![
                "2024-05-03".to_string(),
                "2024-05-01".to_string(),
                "2024-05-02".to_string(),
                "2024-05-01".to_string(),
            ];
            let dates = normalize_dates(raw).unwrap();
            assert_eq!(
                dates,
                vec![date("2024-05-01"), date("2024-05-02"), date("2024-05-03")]
            );
        }

        #[test]
        fn test_single_bad_entry_rejects_payload() {
            let raw = vec!["2024-01-01".to_string(), "bad-date".to_string()];
            assert!(matches!(
                normalize_dates(raw),
                Err(FetchError::Validation(_))
            ));
        }

        #[test]
        fn test_empty_payload_is_ok() {
            assert!(normalize_dates(Vec::new()).unwrap().is_empty());
        }
    }

    mod cursor_tests {
        use super::*;

        fn seeded() -> DateCursor {
            DateCursor::from_dates(vec![
                date("2024-05-01"),
                date("2024-05-02"),
                date("2024-05-03"),
            ])
        }

        #[test]
        fn test_seeding_selects_latest() {
            let cursor = seeded();
            assert_eq!(cursor.current(), Some(&date("2024-05-03")));
            assert!(cursor.has_previous());
            assert!(!cursor.has_next());
        }

        #[test]
        fn test_previous_steps_back_one_date() {
            let mut cursor = seeded();
            assert!(cursor.go_to_previous());
            assert_eq!(cursor.current(), Some(&date("2024-05-02")));
            assert!(cursor.has_next());
        }

        #[test]
        fn test_previous_clamps_at_first_date() {
            let mut cursor = seeded();
            assert!(cursor.go_to_previous());
            assert!(cursor.go_to_previous());
            assert_eq!(cursor.current(), Some(&date("2024-05-01")));
            assert!(!cursor.has_previous());
            assert!(!cursor.go_to_previous());
            assert_eq!(cursor.current(), Some(&date("2024-05-01")));
        }

        #[test]
        fn test_next_clamps_at_latest_date() {
            let mut cursor = seeded();
            assert!(!cursor.go_to_next());
            assert_eq!(cursor.current(), Some(&date("2024-05-03")));
        }

        #[test]
        fn test_empty_cursor_disables_everything() {
            let mut cursor = DateCursor::new();
            assert!(cursor.current().is_none());
            assert!(!cursor.has_previous());
            assert!(!cursor.has_next());
            assert!(!cursor.go_to_previous());
            assert!(!cursor.go_to_next());
        }

        #[test]
        fn test_single_date_has_no_navigation() {
            let cursor = DateCursor::from_dates(vec![date("2024-05-01")]);
            assert_eq!(cursor.current(), Some(&date("2024-05-01")));
            assert!(!cursor.has_previous());
            assert!(!cursor.has_next());
        }
    }
}
