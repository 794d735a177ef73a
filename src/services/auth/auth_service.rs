//! Registration and credential login.

use std::sync::Arc;

use bcrypt::{hash, verify};
use singleton_macro::service;

use crate::config::PasswordConfig;
use crate::core::errors::AppError;
use crate::domain::dto::users::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::domain::entities::user::User;
use crate::repositories::users::user_repo::UserRepository;
use crate::services::auth::token_service::TokenService;
use crate::utils::string_utils::{normalize_email, validate_required_string};

/// Same message for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "البريد الإلكتروني أو كلمة المرور غير صحيحة";

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
}

impl AuthService {
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let name = validate_required_string(&request.name, "الاسم")?;
        let email = normalize_email(&request.email);

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateError("البريد الإلكتروني مستخدم بالفعل".to_string()));
        }

        let password_hash = hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))?;

        // The unique index still catches a concurrent registration
        let user = self.user_repo
            .create(User::new(name, email, password_hash))
            .await
            .map_err(|e| match e {
                AppError::DuplicateError(_) => {
                    AppError::DuplicateError("البريد الإلكتروني مستخدم بالفعل".to_string())
                }
                other => other,
            })?;

        log::info!("new account registered: {}", user.id_string());
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let mut user = self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("password verification failed: {}", e)))?;

        if !matches {
            log::warn!("failed login for {}", email);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            log::warn!("login attempt on deactivated account {}", user.id_string());
            return Err(AppError::AuthenticationError("تم تعطيل هذا الحساب".to_string()));
        }

        if let Some(id) = user.id {
            self.user_repo.touch_last_login(id).await?;
            user.last_login_at = Some(mongodb::bson::DateTime::now());
        }

        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = TokenService::instance().generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
