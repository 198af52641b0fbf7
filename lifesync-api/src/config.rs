/// Configuration management for the API server
///
/// Configuration is read from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to, falling back to `PORT` (default: 3001)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_CONNECT_RETRIES`: Startup connection attempts (default: 5)
/// - `DATABASE_RETRY_DELAY_SECS`: Delay between attempts (default: 5)
/// - `JWT_SECRET`: Secret key for JWT signing, at least 32 characters (required)
/// - `JWT_EXPIRATION_DAYS`: Token lifetime (default: 30)
/// - `CORS_ORIGIN`: Comma-separated allowed origins, `*` for any (default: `*`)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `RUST_LOG` / `LOG_FORMAT`: Log filter and `json` output
///
/// # Example
///
/// ```no_run
/// use lifesync_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use lifesync_shared::db::pool;
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_retries: u32,
    pub retry_delay_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in days
    pub expiration_days: i64,
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping empty entries
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, the
    /// secret is shorter than 32 characters, or a numeric variable does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = match env::var("API_PORT") {
            Ok(_) => parse_var("API_PORT", 3001u16)?,
            Err(_) => parse_var("PORT", 3001u16)?,
        };

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expiration_days = parse_var("JWT_EXPIRATION_DAYS", 30i64)?;
        if expiration_days <= 0 {
            anyhow::bail!("JWT_EXPIRATION_DAYS must be positive");
        }

        let cors_origins = parse_cors_origins(&env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()));
        let production = parse_var("PRODUCTION", false)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10u32)?,
                connect_retries: parse_var("DATABASE_CONNECT_RETRIES", 5u32)?,
                retry_delay_seconds: parse_var("DATABASE_RETRY_DELAY_SECS", 5u64)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_days,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            connect_retries: self.database.connect_retries,
            retry_delay_seconds: self.database.retry_delay_seconds,
            ..Default::default()
        }
    }

    /// Whether any origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/lifesync_test".to_string(),
                max_connections: 10,
                connect_retries: 5,
                retry_delay_seconds: 5,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                expiration_days: 30,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(config().bind_address(), "127.0.0.1:3001");
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(parse_cors_origins("*"), vec!["*"]);
        assert_eq!(
            parse_cors_origins("http://localhost:3000, https://app.lifesync.dev ,"),
            vec!["http://localhost:3000", "https://app.lifesync.dev"]
        );
        assert_eq!(parse_cors_origins(" , "), vec!["*"]);
    }

    #[test]
    fn test_pool_config() {
        let pool = config().pool_config();
        assert_eq!(pool.url, "postgresql://localhost/lifesync_test");
        assert_eq!(pool.max_connections, 10);
        assert_eq!(pool.connect_retries, 5);
    }

    #[test]
    fn test_allows_any_origin() {
        let mut cfg = config();
        assert!(cfg.allows_any_origin());

        cfg.api.cors_origins = vec!["http://localhost:3000".to_string()];
        assert!(!cfg.allows_any_origin());
    }
}
