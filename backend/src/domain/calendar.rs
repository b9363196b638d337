//! Calendar-day normalisation.
//!
//! Check-ins and streaks work at day granularity. Every instant is reduced to
//! its UTC calendar day so that "today" means the same thing for the HTTP
//! layer, the services and both storage adapters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mockable::Clock;

/// Errors raised while parsing client-supplied dates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The value was neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    #[error("malformed date: {value}")]
    MalformedDate {
        /// Raw input as received.
        value: String,
    },
}

/// UTC calendar day of the clock's current instant.
pub fn today(clock: &dyn Clock) -> NaiveDate {
    day_of(clock.utc())
}

/// UTC calendar day containing `instant`.
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// The day before `day`, saturating at [`NaiveDate::MIN`].
pub fn previous_day(day: NaiveDate) -> NaiveDate {
    day.pred_opt().unwrap_or(day)
}

/// Parse a check-in date.
///
/// Accepts a plain `YYYY-MM-DD` date, an RFC 3339 timestamp (converted to UTC
/// and truncated) or a zone-less ISO 8601 timestamp, which is read as UTC.
///
/// # Examples
/// ```
/// use backend::domain::calendar::parse_check_in_date;
/// use chrono::NaiveDate;
///
/// let day = parse_check_in_date("2026-03-01T23:30:00-02:00").unwrap();
/// assert_eq!(day, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// ```
pub fn parse_check_in_date(raw: &str) -> Result<NaiveDate, CalendarError> {
    let value = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(day_of(instant.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|local| local.date())
        .map_err(|_| CalendarError::MalformedDate {
            value: raw.to_owned(),
        })
}
