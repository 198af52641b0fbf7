/// Request authentication and family-scope resolution
///
/// Every protected request goes through [`authenticate`]:
///
/// 1. Extract the `Authorization: Bearer <token>` header
/// 2. Validate the JWT (signature, issuer, expiry)
/// 3. Load the user from the database and reject unknown or inactive accounts
/// 4. Resolve the family scope from the stored user
///
/// The resulting [`AuthContext`] is inserted into request extensions and every
/// handler filters its queries by `AuthContext::family_id`.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use lifesync_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User {} in family {}", auth.user_id, auth.family_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::User;

/// Authentication context added to request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated account, as currently stored
    pub user: User,

    /// Authenticated user ID
    pub user_id: Uuid,

    /// Family scope for all data access
    pub family_id: Uuid,
}

impl AuthContext {
    /// Builds the context for an active user
    pub fn from_user(user: User) -> Self {
        Self {
            user_id: user.id,
            family_id: user.family_scope(),
            user,
        }
    }

    /// Whether the caller owns the household
    pub fn is_owner(&self) -> bool {
        self.user.is_owner()
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Header missing or not a bearer token
    #[error("No token provided")]
    MissingToken,

    /// Bad signature, issuer or format
    #[error("Invalid token")]
    InvalidToken,

    /// Token past its expiry
    #[error("Token expired")]
    TokenExpired,

    /// Token subject does not exist or is deactivated
    #[error("User not found or inactive")]
    UserNotFound,

    /// Database error while loading the user
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Database error during authentication");
                json!({ "error": "internal_error", "message": "Internal server error" })
            }
            other => json!({ "error": "unauthorized", "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

/// Extracts the token from an `Authorization` header value
///
/// Only the `Bearer <token>` form is accepted; anything else counts as no
/// token at all.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Validates a bearer token without touching the database
pub fn verify_claims(header: Option<&str>, secret: &str) -> Result<Claims, AuthError> {
    let token = bearer_token(header)?;
    Ok(validate_token(token, secret)?)
}

/// Authenticates a request and resolves its family scope
///
/// # Errors
///
/// - `MissingToken`: header missing or not a bearer token
/// - `InvalidToken`: signature, issuer or format check failed
/// - `TokenExpired`: token is past `exp`
/// - `UserNotFound`: subject does not exist or is inactive
/// - `Database`: the user lookup failed
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let claims = verify_claims(header, secret)?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::UserNotFound)?;

    Ok(AuthContext::from_user(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use crate::models::user::{tests::sample_user, UserRole};
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_auth_context_from_member() {
        let family = Uuid::new_v4();
        let user = sample_user(UserRole::Member, Some(family));
        let user_id = user.id;

        let ctx = AuthContext::from_user(user);

        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.family_id, family);
        assert!(!ctx.is_owner());
    }

    #[test]
    fn test_auth_context_from_owner_without_family() {
        let user = sample_user(UserRole::Owner, None);
        let ctx = AuthContext::from_user(user);

        assert_eq!(ctx.family_id, ctx.user_id);
        assert!(ctx.is_owner());
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("Basic abc")), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("Bearer ")), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("bearer abc")), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_verify_claims() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();
        let header = format!("Bearer {}", token);

        let claims = verify_claims(Some(&header), SECRET).unwrap();
        assert_eq!(claims.sub, user_id);

        assert!(matches!(
            verify_claims(Some(&header), "another-secret-key-of-32-bytes!!"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            verify_claims(Some("Bearer garbage"), SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_claims_expired() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-60));
        let token = create_token(&claims, SECRET).unwrap();
        let header = format!("Bearer {}", token);

        assert!(matches!(
            verify_claims(Some(&header), SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        assert_eq!(AuthError::MissingToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Database(sqlx::Error::PoolTimedOut).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "No token provided");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found or inactive");
    }
}
