/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health check and startup retry
/// - `migrations`: Embedded schema migrations
///
/// Models live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
