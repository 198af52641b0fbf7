/// Middleware for the API server
///
/// - `auth`: bearer-token authentication for the household routes
/// - `security`: security response headers

pub mod auth;
pub mod security;
