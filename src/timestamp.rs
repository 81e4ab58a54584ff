use chrono::{Datelike, NaiveDate};

use crate::{dates::parse_date, error::FormatError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d 00:00:00";

/// Best guess at when a citation happened.
///
/// `file_date` is the day the citation was retrieved (`YYYY-MM-DD`). When its year agrees with
/// the citation's own `year`, the full retrieval date is kept; otherwise only the year is
/// trusted and the result falls back to January 1st of `year`.
pub fn reconcile(year: &str, file_date: &str) -> Result<String, FormatError> {
    let retrieved = parse_date(file_date)?;
    let year = parse_year(year)?;

    let date = if retrieved.year() == year {
        retrieved
    } else {
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| FormatError::Year(year.to_string()))?
    };

    Ok(date.format(TIMESTAMP_FORMAT).to_string())
}

fn parse_year(s: &str) -> Result<i32, FormatError> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::Year(s.to_string()));
    }
    match s.parse() {
        Ok(year) if year >= 1 => Ok(year),
        _ => Err(FormatError::Year(s.to_string())),
    }
}
