/// Calendar periods and date parsing
///
/// Summaries and "today"/"overdue" views are computed over UTC ranges.
/// All ranges returned here are half-open: `start <= t < end`.
///
/// Clients send dates either as RFC 3339 timestamps or as plain `YYYY-MM-DD`
/// dates, so request bodies and query strings go through [`parse_datetime`].
///
/// # Example
///
/// ```
/// use lifesync_shared::period::month_range;
///
/// let (start, end) = month_range(2025, 2).unwrap();
/// assert_eq!(start.to_rfc3339(), "2025-02-01T00:00:00+00:00");
/// assert_eq!(end.to_rfc3339(), "2025-03-01T00:00:00+00:00");
/// ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Error type for period construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Month outside 1..=12
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(i32),

    /// Year that chrono cannot represent
    #[error("year {0} is out of range")]
    InvalidYear(i32),
}

/// Upper bound of a user-supplied date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndBound {
    /// `t <= bound` (a full timestamp was given)
    Inclusive(DateTime<Utc>),

    /// `t < bound` (a date was given, bound is the following midnight)
    Exclusive(DateTime<Utc>),
}

impl EndBound {
    /// SQL comparison operator for this bound
    pub fn operator(&self) -> &'static str {
        match self {
            EndBound::Inclusive(_) => " <= ",
            EndBound::Exclusive(_) => " < ",
        }
    }

    /// The boundary instant
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            EndBound::Inclusive(t) | EndBound::Exclusive(t) => *t,
        }
    }
}

/// Parses an RFC 3339 timestamp, a zone-less `YYYY-MM-DDTHH:MM:SS` (taken as
/// UTC), or a plain `YYYY-MM-DD` date (UTC midnight).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    parse_date(value).map(start_of_day)
}

/// Parses the end of a filter range.
///
/// A date-only value covers that whole day.
pub fn parse_end_bound(value: &str) -> Option<EndBound> {
    if let Some(date) = parse_date(value.trim()) {
        let next = date.succ_opt()?;
        return Some(EndBound::Exclusive(start_of_day(next)));
    }

    parse_datetime(value).map(EndBound::Inclusive)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Half-open UTC range covering one calendar month
pub fn month_range(year: i32, month: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), PeriodError> {
    if !(1..=12).contains(&month) {
        return Err(PeriodError::InvalidMonth(month));
    }

    let first = NaiveDate::from_ymd_opt(year, month as u32, 1).ok_or(PeriodError::InvalidYear(year))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month as u32 + 1, 1)
    }
    .ok_or(PeriodError::InvalidYear(year))?;

    Ok((start_of_day(first), start_of_day(next)))
}

/// Half-open UTC range covering the day containing `now`
pub fn day_range(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(now.date_naive());
    (start, start + Duration::days(1))
}

/// `(month, year)` of `now`, month 1-based
pub fn current_period(now: DateTime<Utc>) -> (i32, i32) {
    (now.month() as i32, now.year())
}

/// Serde helpers accepting [`parse_datetime`] formats
pub mod flexible_date {
    use super::parse_datetime;
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    /// Required date field
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    /// Optional date field; pair with `#[serde(default)]`
    pub fn option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|r| parse_datetime(&r).ok_or_else(|| de::Error::custom(format!("invalid date: {}", r))))
            .transpose()
    }
}
