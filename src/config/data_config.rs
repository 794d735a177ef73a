//! Server, data and request-shaping settings.
//!
//! Each struct is a namespace of associated functions reading the
//! environment on demand, with defaults that are safe for local development.

use std::env;

/// Deployment environment
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Reads `ENVIRONMENT`, falling back to `NODE_ENV`, then `production`
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "production".to_string());
        Self::from_str(&raw)
    }

    /// Case-insensitive parse; unknown values map to `Production`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// bcrypt cost factor
pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST` when it is within 4..=15, otherwise the environment default
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development | Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP listener
pub struct ServerConfig;

impl ServerConfig {
    /// `PORT`, default 5000
    pub fn port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(5000)
    }

    /// `HOST`, default all interfaces
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// `WORKERS`, default 4
    pub fn workers() -> usize {
        env::var("WORKERS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(4)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// Per-IP request throttling
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// `RATE_LIMIT_PER_SECOND` (10) and `RATE_LIMIT_BURST_SIZE` (100)
    pub fn from_env() -> Self {
        let per_second = env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(|| {
                log::debug!("RATE_LIMIT_PER_SECOND not set or invalid, using 10");
                10
            });

        let burst_size = env::var("RATE_LIMIT_BURST_SIZE")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(|| {
                log::debug!("RATE_LIMIT_BURST_SIZE not set or invalid, using 100");
                100
            });

        Self { per_second, burst_size }
    }
}

/// Browser origins allowed by CORS
pub struct CorsConfig;

impl CorsConfig {
    /// `CLIENT_URL`, comma separated
    pub fn allowed_origins() -> Vec<String> {
        let raw = env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::parse_origins(&raw)
    }

    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

/// List endpoint defaults
pub struct PaginationConfig;

impl PaginationConfig {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;
}

/// Opportunity listing behaviour
pub struct OpportunityConfig;

impl OpportunityConfig {
    /// Days before the deadline at which an opportunity is flagged urgent
    pub fn urgent_window_days() -> i64 {
        env::var("URGENT_WINDOW_DAYS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|days| *days >= 0)
            .unwrap_or(7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("DEV"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_parse_origins() {
        let origins = CorsConfig::parse_origins("http://localhost:3000/, https://youth.example.org ,");
        assert_eq!(origins, vec!["http://localhost:3000", "https://youth.example.org"]);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 5000);
        }
        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }
}
