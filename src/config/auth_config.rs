//! # Authentication settings
//!
//! HS256 JWT parameters. The token is issued by `POST /api/auth/register`
//! and `POST /api/auth/login` and verified by `AuthMiddleware` on every
//! protected scope.
//!
//! ```bash
//! export JWT_SECRET="change-me"
//! export JWT_EXPIRATION_HOURS="168"
//! ```

use std::env;

/// JWT signing configuration
pub struct JwtConfig;

impl JwtConfig {
    /// Shared HMAC secret.
    ///
    /// Falls back to a development secret with a warning; production
    /// deployments must set `JWT_SECRET`.
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using development default");
            "youth-hub-dev-secret".to_string()
        })
    }

    /// Token lifetime, default one week
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|hours: &i64| *hours > 0)
            .unwrap_or(168)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_default() {
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 168);
        }
    }
}
