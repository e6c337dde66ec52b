//! Application configuration loaded from environment variables.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use board_infra::{DatabaseConfig, JwtConfig, PasswordConfig};
#[cfg(feature = "rate-limit")]
use board_infra::RateLimitConfig;

/// Accepted token lifetimes, one hour up to one year.
const JWT_EXPIRATION_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;

/// Configuration errors, reported before the server binds.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when RUST_ENV=production")]
    MissingInProduction(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Deployment environment name (`RUST_ENV`).
    pub environment: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Whether `JWT_SECRET` was provided rather than defaulted.
    pub jwt_configured: bool,
    pub password: PasswordConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub api_key_present: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let jwt_secret = get("JWT_SECRET");
        let jwt_configured = jwt_secret.is_some();
        let secret = match jwt_secret {
            Some(secret) => secret,
            None if is_production(&environment) => {
                return Err(ConfigError::MissingInProduction("JWT_SECRET"));
            }
            None => {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
                JwtConfig::DEV_SECRET.to_string()
            }
        };

        let jwt_defaults = JwtConfig::default();
        let expiration_hours =
            parse_or(&get, "JWT_EXPIRATION_HOURS", jwt_defaults.expiration_hours)?;
        if !JWT_EXPIRATION_HOURS_RANGE.contains(&expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: expiration_hours.to_string(),
            });
        }
        let jwt = JwtConfig {
            secret,
            expiration_hours,
            issuer: get("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        let password_defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&get, "ARGON2_MEMORY_KIB", password_defaults.memory_kib)?,
            iterations: parse_or(&get, "ARGON2_ITERATIONS", password_defaults.iterations)?,
            parallelism: parse_or(&get, "ARGON2_PARALLELISM", password_defaults.parallelism)?,
        };

        #[cfg(feature = "rate-limit")]
        let rate_limit = {
            let defaults = RateLimitConfig::default();
            RateLimitConfig {
                max_requests: parse_or(&get, "RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?,
                window: Duration::from_secs(parse_or(
                    &get,
                    "RATE_LIMIT_WINDOW_SECS",
                    defaults.window.as_secs(),
                )?),
            }
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 3000)?,
            database: Self::database_config(&get)?,
            environment,
            jwt,
            jwt_configured,
            password,
            #[cfg(feature = "rate-limit")]
            rate_limit,
            api_key_present: get("API_KEY").is_some(),
        })
    }

    /// Pool settings plus the connection URL.
    ///
    /// `DATABASE_URL` wins; otherwise the URL is assembled from the
    /// `POSTGRES_*` variables.
    fn database_config<G>(get: &G) -> Result<DatabaseConfig, ConfigError>
    where
        G: Fn(&str) -> Option<String>,
    {
        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let user = get("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string());
                let password = get("POSTGRES_PASSWORD").unwrap_or_default();
                let host = get("POSTGRES_HOST").unwrap_or_else(|| "postgres".to_string());
                let port: u16 = parse_or(get, "POSTGRES_PORT", 5432)?;
                let db = get("POSTGRES_DB").unwrap_or_else(|| user.clone());
                format!("postgres://{user}:{password}@{host}:{port}/{db}")
            }
        };

        let defaults = DatabaseConfig::new(url);
        Ok(DatabaseConfig {
            max_connections: parse_or(get, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or(get, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout: Duration::from_secs(parse_or(
                get,
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )?),
            idle_timeout: Duration::from_secs(parse_or(
                get,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
            sqlx_logging: parse_or(get, "DB_LOG_QUERIES", false)?,
            ..defaults
        })
    }
}

fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert!(!config.jwt_configured);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.database.idle_timeout, Duration::from_secs(30));
        assert!(!config.api_key_present);
    }

    #[test]
    fn test_database_url_assembled_from_postgres_vars() {
        let config = load(&[
            ("POSTGRES_USER", "app"),
            ("POSTGRES_PASSWORD", "pw"),
            ("POSTGRES_HOST", "db.internal"),
            ("POSTGRES_DB", "board"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "postgres://app:pw@db.internal:5432/board");
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("POSTGRES_HOST", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let err = load(&[("RUST_ENV", "production")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingInProduction("JWT_SECRET"));

        let err = load(&[("RUST_ENV", "prod")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingInProduction("JWT_SECRET"));

        let config = load(&[("RUST_ENV", "production"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert!(config.jwt_configured);
        assert_eq!(config.jwt.secret, "s3cret");
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_jwt_expiration_must_be_a_usable_lifetime() {
        for value in ["-1", "0", "8761", "4611686018427387903"] {
            let err = load(&[("JWT_EXPIRATION_HOURS", value)]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    key: "JWT_EXPIRATION_HOURS",
                    value: value.to_string()
                }
            );
        }

        let config = load(&[("JWT_EXPIRATION_HOURS", "8760")]).unwrap();
        assert_eq!(config.jwt.expiration_hours, 8760);
    }

    #[test]
    fn test_work_factor_and_api_key() {
        let config = load(&[
            ("ARGON2_MEMORY_KIB", "4096"),
            ("ARGON2_ITERATIONS", "3"),
            ("API_KEY", "k"),
        ])
        .unwrap();

        assert_eq!(config.password.memory_kib, 4096);
        assert_eq!(config.password.iterations, 3);
        assert!(config.api_key_present);
    }

    #[cfg(feature = "rate-limit")]
    #[test]
    fn test_rate_limit_defaults_to_100_per_15_minutes() {
        let config = load(&[]).unwrap();

        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
    }
}
