use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FormatError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono alone is lenient about field widths (`2020-5-7` parses), so the shape is checked first.
/// Year 0 does not exist in the calendar these dates come from and is rejected.
pub fn parse_date(s: &str) -> Result<NaiveDate, FormatError> {
    static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

    if !DATE_RE.is_match(s) {
        return Err(FormatError::Date(s.to_string()));
    }
    match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(date) if date.year() >= 1 => Ok(date),
        _ => Err(FormatError::Date(s.to_string())),
    }
}

/// An inclusive span of calendar days.
///
/// The range holds no iteration state, so every call to [`DateRange::iter`] starts over from
/// `start`. A range whose start lies after its cutoff is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    cutoff: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, cutoff: NaiveDate) -> Self {
        DateRange { start, cutoff }
    }

    pub fn iter(&self) -> Days {
        Days {
            next: Some(self.start).filter(|d| *d <= self.cutoff),
            cutoff: self.cutoff,
        }
    }

    /// Number of days in the range, endpoints included.
    pub fn len(&self) -> usize {
        let span = (self.cutoff - self.start).num_days();
        if span < 0 { 0 } else { span as usize + 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.cutoff
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Lazily yields one day at a time up to and including the cutoff.
#[derive(Clone, Debug)]
pub struct Days {
    next: Option<NaiveDate>,
    cutoff: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let day = self.next?;
        self.next = day.succ_opt().filter(|d| *d <= self.cutoff);
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .next
            .map(|d| (self.cutoff - d).num_days() as usize + 1)
            .unwrap_or(0);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Days {}

/// Day-by-day range between two `YYYY-MM-DD` strings.
pub fn generate_dates(start: &str, cutoff: &str) -> Result<DateRange, FormatError> {
    Ok(DateRange::new(parse_date(start)?, parse_date(cutoff)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::Strategy;

    fn day() -> impl Strategy<Value = NaiveDate> {
        // 1900-01-01 .. roughly 2100
        (0i64..73_000).prop_map(|n| {
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(n)
        })
    }

    #[test]
    fn yields_every_day_inclusive() {
        proptest::proptest!(|(start in day(), span in 0i64..800)| {
            let cutoff = start + chrono::Duration::days(span);
            let days: Vec<_> = DateRange::new(start, cutoff).iter().collect();
            proptest::prop_assert_eq!(days.len() as i64, span + 1);
            proptest::prop_assert_eq!(days.first().copied(), Some(start));
            proptest::prop_assert_eq!(days.last().copied(), Some(cutoff));
            for pair in days.windows(2) {
                proptest::prop_assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
            }
        })
    }

    #[test]
    fn start_after_cutoff_is_empty() {
        proptest::proptest!(|(cutoff in day(), gap in 1i64..800)| {
            let range = DateRange::new(cutoff + chrono::Duration::days(gap), cutoff);
            proptest::prop_assert!(range.is_empty());
            proptest::prop_assert_eq!(range.len(), 0);
            proptest::prop_assert_eq!(range.iter().count(), 0);
        })
    }

    #[test]
    fn iteration_restarts() {
        let range = generate_dates("2020-02-27", "2020-03-01").unwrap();
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = range.into_iter().collect();
        assert_eq!(first, second);
        // leap day
        assert_eq!(first.len(), 4);
        assert_eq!(first[2], NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    }

    #[test]
    fn len_matches_iterator() {
        let range = generate_dates("2019-12-30", "2020-01-02").unwrap();
        let days = range.iter();
        assert_eq!(range.len(), 4);
        assert_eq!(days.len(), 4);
    }

    #[test]
    fn single_day_range() {
        let range = generate_dates("2021-06-01", "2021-06-01").unwrap();
        assert_eq!(
            range.iter().collect::<Vec<_>>(),
            vec![NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()]
        );
    }

    #[test]
    fn parse_date_is_strict() {
        for bad in ["2020-5-17", "20-05-17", "2020/05/17", "2020-05-17 ", "2020-02-30", "", "0000-01-01"] {
            assert!(
                matches!(parse_date(bad), Err(FormatError::Date(_))),
                "accepted {bad:?}"
            );
        }
        assert_eq!(
            parse_date("2020-05-17").unwrap(),
            NaiveDate::from_ymd_opt(2020, 5, 17).unwrap()
        );
    }

    #[test]
    fn generate_dates_rejects_bad_endpoints() {
        assert!(generate_dates("yesterday", "2020-01-01").is_err());
        assert!(generate_dates("2020-01-01", "2020-13-01").is_err());
    }
}
