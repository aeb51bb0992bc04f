//! Date parsing
//!
//! Store files mix ISO dates, `DD.MM.YYYY` dates and full timestamps. All of
//! them become a [`Timestamp`]; bare dates mean 00:00 UTC on that day.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

use crate::store::StoreError;

/// Parse a store date or timestamp.
///
/// Accepts `YYYY-MM-DD`, `DD.MM.YYYY` and RFC 3339 timestamps.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDate`] if the string matches none of the formats
/// or names a day that does not exist.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, StoreError> {
    let trimmed = s.trim();

    if let Ok(timestamp) = trimmed.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let date = if trimmed.contains('.') {
        parse_dotted_date(trimmed)?
    } else {
        trimmed
            .parse::<Date>()
            .map_err(|_err| StoreError::InvalidDate(s.to_string()))?
    };

    date.to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|_err| StoreError::InvalidDate(s.to_string()))
}

/// `DD.MM.YYYY`
fn parse_dotted_date(s: &str) -> Result<Date, StoreError> {
    let invalid = || StoreError::InvalidDate(s.to_string());

    let mut parts = s.split('.');

    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let day = day.parse::<i8>().map_err(|_err| invalid())?;
    let month = month.parse::<i8>().map_err(|_err| invalid())?;
    let year = year.parse::<i16>().map_err(|_err| invalid())?;

    Date::new(year, month, day).map_err(|_err| invalid())
}
