/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Errors render as
///
/// ```json
/// { "error": "bad_request", "message": "...", "details": [ ... ] }
/// ```
///
/// where `details` is only present for validation failures.
///
/// # Example
///
/// ```
/// use lifesync_api::error::{ApiError, ApiResult};
///
/// fn find(found: bool) -> ApiResult<&'static str> {
///     if !found {
///         return Err(ApiError::NotFound("Expense not found".to_string()));
///     }
///     Ok("expense")
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifesync_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};
use lifesync_shared::period::PeriodError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique constraint on user emails
const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409)
    Conflict(String),

    /// Request validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// 404 with the conventional "<Entity> not found" message
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Postgres error codes: 23505 unique, 23514 check, 23503 foreign key,
/// 22P02 invalid text representation.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                let constraint = db_err.constraint().map(str::to_string);

                match code.as_str() {
                    "23505" if constraint.as_deref() == Some(USERS_EMAIL_CONSTRAINT) => {
                        ApiError::BadRequest("Email already registered".to_string())
                    }
                    "23505" => ApiError::Conflict(format!(
                        "Constraint violation: {}",
                        constraint.unwrap_or_default()
                    )),
                    "23514" | "22P02" => ApiError::BadRequest(format!(
                        "Invalid value: {}",
                        constraint.unwrap_or_else(|| db_err.message().to_string())
                    )),
                    "23503" => ApiError::BadRequest("Referenced record does not exist".to_string()),
                    _ => ApiError::InternalError(format!("Database error: {}", db_err)),
                }
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
///
/// Handlers only create tokens, so any failure here is on our side.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Token operation failed: {}", err))
    }
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Convert `validator` errors into field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                })
            })
            .collect();

        // Nested list errors (bulk bodies) are reported once per list
        for (field, kind) in errors.errors() {
            if let validator::ValidationErrorsKind::List(items) = kind {
                for index in items.keys() {
                    details.push(ValidationErrorDetail {
                        field: format!("{}[{}]", field, index),
                        message: "Invalid entry".to_string(),
                    });
                }
            }
        }

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Body {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 0.0))]
        amount: f64,
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        assert_eq!(ApiError::not_found("Expense").to_string(), "Not found: Expense not found");
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let body = Body { name: String::new(), amount: -1.0 };
        let err = ApiError::from(body.validate().unwrap_err());

        match &err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0].field, "amount");
                assert_eq!(details[1].field, "name");
                assert_eq!(details[1].message, "Name is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized("x".into()).into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict("x".into()).into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InternalError("secret detail".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        match ApiError::from(AuthError::TokenExpired) {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Token expired"),
            other => panic!("unexpected error: {:?}", other),
        }
        match ApiError::from(AuthError::UserNotFound) {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "User not found or inactive"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_authz_errors_map_to_403() {
        match ApiError::from(AuthzError::OwnerNotDeletable) {
            ApiError::Forbidden(msg) => assert_eq!(msg, "Cannot delete family owner account"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert!(matches!(ApiError::from(sqlx::Error::RowNotFound), ApiError::NotFound(_)));
    }

    #[test]
    fn test_period_error_maps_to_400() {
        let err = ApiError::from(PeriodError::InvalidMonth(13));
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "month must be between 1 and 12, got 13"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
