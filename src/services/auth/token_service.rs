//! # JWT service
//!
//! HS256 tokens signed with `JWT_SECRET`. The claims carry the user id
//! (`sub` and `userId`) and the role at issue time; the middleware still
//! reloads the user so role changes and deactivation apply immediately.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;

use crate::config::JwtConfig;
use crate::core::errors::{AppError, ErrorContext};
use crate::domain::entities::user::User;
use crate::domain::models::token::TokenClaims;

#[service(name = "token")]
pub struct TokenService {}

impl TokenService {
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let user_id = user
            .id
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::InternalError("user has no id".to_string()))?;

        let now = Utc::now();
        let expiration = now + Duration::hours(JwtConfig::expiration_hours());

        let claims = TokenClaims {
            sub: user_id.clone(),
            user_id,
            role: user.role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let secret = JwtConfig::secret();
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))
            .context("JWT encoding failed")
    }

    /// Every failure is a 401: expired, bad signature, malformed
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let secret = JwtConfig::secret();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("انتهت صلاحية الجلسة، يرجى تسجيل الدخول مجدداً".to_string())
                }
                _ => {
                    log::warn!("rejected token: {}", e);
                    AppError::AuthenticationError("رمز المصادقة غير صالح".to_string())
                }
            })
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("صيغة ترويسة المصادقة غير صالحة".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;
    use mongodb::bson::oid::ObjectId;

    fn service() -> TokenService {
        TokenService {}
    }

    fn user() -> User {
        let mut user = User::new("سارة".into(), "sara@example.com".into(), "hash".into());
        user.id = Some(ObjectId::new());
        user.role = UserRole::Instructor;
        user
    }

    #[test]
    fn test_generate_then_verify() {
        let user = user();
        let token = service().generate_token(&user).unwrap();
        let claims = service().verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user.id_string());
        assert_eq!(claims.sub, claims.user_id);
        assert_eq!(claims.role, UserRole::Instructor);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "x".into(),
            user_id: "x".into(),
            role: UserRole::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JwtConfig::secret().as_ref()),
        )
        .unwrap();

        assert!(matches!(service().verify_token(&token), Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(matches!(service().verify_token("not.a.jwt"), Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(service().extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service().extract_bearer_token("Basic abc").is_err());
        assert!(service().extract_bearer_token("Bearer   ").is_err());
    }
}
