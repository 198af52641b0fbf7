/// API route handlers
///
/// One module per resource:
///
/// - `root`, `health`: service metadata and liveness (public)
/// - `auth`: registration, login, profile and member accounts
/// - `expenses`, `incomes`, `budgets`, `savings`, `tasks`, `reminders`,
///   `health_records`, `family_members`, `family_numbers`: family-scoped
///   records
///
/// Query strings are taken as raw strings and parsed here, so a bad value
/// produces the standard JSON 400 body.

use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use lifesync_shared::period::{self, EndBound};
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod budgets;
pub mod expenses;
pub mod family_members;
pub mod family_numbers;
pub mod health;
pub mod health_records;
pub mod incomes;
pub mod reminders;
pub mod root;
pub mod savings;
pub mod tasks;

/// `{ "message": ... }` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// "<Entity> deleted successfully"
    pub fn deleted(entity: &str) -> Self {
        Self::new(format!("{} deleted successfully", entity))
    }
}

/// `?month=&year=` of the monthly summaries
#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// Boolean query flag: only the literal `true` is true
pub fn query_flag(value: Option<&str>) -> Option<bool> {
    value.map(|v| v == "true")
}

/// Parses the start of a date range filter
pub fn parse_start(field: &str, value: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    match value {
        None => Ok(None),
        Some(raw) => period::parse_datetime(raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", field, raw))),
    }
}

/// Parses the end of a date range filter; a bare date covers the whole day
pub fn parse_end(field: &str, value: Option<&str>) -> ApiResult<Option<EndBound>> {
    match value {
        None => Ok(None),
        Some(raw) => period::parse_end_bound(raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", field, raw))),
    }
}

/// Parses a positive `limit`
pub fn parse_limit(value: Option<&str>) -> ApiResult<Option<i64>> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ApiError::BadRequest(
                "limit must be a positive integer".to_string(),
            )),
        },
    }
}

/// Resolves `month` and `year` query values to a half-open UTC range
pub fn parse_month(
    month: Option<&str>,
    year: Option<&str>,
) -> ApiResult<(DateTime<Utc>, DateTime<Utc>)> {
    let month = month
        .and_then(|m| m.trim().parse::<i32>().ok())
        .ok_or_else(|| ApiError::BadRequest("month must be between 1 and 12".to_string()))?;
    let year = year
        .and_then(|y| y.trim().parse::<i32>().ok())
        .ok_or_else(|| ApiError::BadRequest("year is required".to_string()))?;

    Ok(period::month_range(year, month)?)
}

/// Parses an optional integer query value
pub fn parse_int(field: &str, value: Option<&str>) -> ApiResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{} must be an integer", field))),
    }
}
