//! # LifeSync Shared Library
//!
//! Types, persistence and business logic used by the LifeSync API server.
//!
//! ## Module Organization
//!
//! - `auth`: Tokens, passwords, request authentication and permission checks
//! - `db`: Connection pool and migrations
//! - `models`: Accounts and family-scoped household records
//! - `period`: Calendar ranges and date parsing
//! - `summary`: Percentages and totals for aggregation endpoints
//! - `validation`: Custom request field validators

pub mod auth;
pub mod db;
pub mod models;
pub mod period;
pub mod summary;
pub mod validation;

/// Current version of the LifeSync shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
