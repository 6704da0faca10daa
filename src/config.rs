use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;

/// One year. Longer lifetimes are refused at startup.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Process configuration, read once from the environment at startup.
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// Secret used to sign session tokens. Never logged.
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::Invalid(name, value) => write!(f, "{} has an invalid value: {:?}", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid(name, value)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_ttl_hours: i64 = parsed("TOKEN_TTL_HOURS", 12)?;
        if token_ttl_hours <= 0 || token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Invalid(
                "TOKEN_TTL_HOURS",
                token_ttl_hours.to_string(),
            ));
        }

        let bcrypt_cost: u32 = parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST", bcrypt_cost.to_string()));
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl: Duration::hours(token_ttl_hours),
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runs as a single test because it mutates process-wide environment variables.
    #[test]
    fn test_config_from_env() {
        for name in [
            "DATABASE_URL",
            "JWT_SECRET",
            "SERVER_PORT",
            "SERVER_HOST",
            "TOKEN_TTL_HOURS",
            "BCRYPT_COST",
            "DATABASE_MAX_CONNECTIONS",
        ] {
            env::remove_var(name);
        }

        assert_eq!(
            Config::from_env().err(),
            Some(ConfigError::Missing("DATABASE_URL"))
        );

        env::set_var("DATABASE_URL", "postgres://test");
        assert_eq!(
            Config::from_env().err(),
            Some(ConfigError::Missing("JWT_SECRET"))
        );

        env::set_var("JWT_SECRET", "s3cret");
        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl, Duration::hours(12));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("TOKEN_TTL_HOURS", "1");
        env::set_var("BCRYPT_COST", "4");

        let config = Config::from_env().unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert_eq!(config.bcrypt_cost, 4);

        env::set_var("SERVER_PORT", "not-a-port");
        assert_eq!(
            Config::from_env().err(),
            Some(ConfigError::Invalid("SERVER_PORT", "not-a-port".to_string()))
        );
        env::set_var("SERVER_PORT", "3000");

        env::set_var("BCRYPT_COST", "2");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("BCRYPT_COST", _))
        ));
        env::set_var("BCRYPT_COST", "4");

        for ttl in ["0", "-3", "10000000000"] {
            env::set_var("TOKEN_TTL_HOURS", ttl);
            assert_eq!(
                Config::from_env().err(),
                Some(ConfigError::Invalid("TOKEN_TTL_HOURS", ttl.to_string()))
            );
        }
        env::set_var("TOKEN_TTL_HOURS", "8760");
        assert_eq!(Config::from_env().unwrap().token_ttl, Duration::hours(8760));
    }
}
