use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::user::{Language, Theme, UserRole};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "الاسم يجب أن يكون بين 2 و 50 حرفاً"))]
    pub name: String,

    #[validate(email(message = "البريد الإلكتروني غير صالح"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "كلمة المرور يجب أن تكون 6 أحرف على الأقل"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "البريد الإلكتروني غير صالح"))]
    pub email: String,

    #[validate(length(min = 1, message = "كلمة المرور مطلوبة"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub language: Option<Language>,
    pub email_notifications: Option<bool>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50, message = "الاسم يجب أن يكون بين 2 و 50 حرفاً"))]
    pub name: Option<String>,

    #[validate(url(message = "رابط الصورة غير صالح"))]
    pub avatar: Option<String>,

    #[validate(length(max = 500, message = "النبذة يجب ألا تتجاوز 500 حرف"))]
    pub bio: Option<String>,

    #[validate(length(max = 20, message = "رقم الهاتف غير صالح"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "الموقع يجب ألا يتجاوز 100 حرف"))]
    pub location: Option<String>,

    #[validate(length(max = 20, message = "لا يمكن إضافة أكثر من 20 اهتماماً"))]
    pub interests: Option<Vec<String>>,

    #[validate(length(max = 30, message = "لا يمكن إضافة أكثر من 30 مهارة"))]
    pub skills: Option<Vec<String>>,

    #[validate(nested)]
    pub preferences: Option<PreferencesPatch>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "كلمة المرور الحالية مطلوبة"))]
    pub current_password: String,

    #[validate(length(min = 6, max = 128, message = "كلمة المرور يجب أن تكون 6 أحرف على الأقل"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

/// Admin user listing filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_letter && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("كلمة المرور يجب أن تحتوي على حروف وأرقام".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            name: "سارة".into(),
            email: "sara@example.com".into(),
            password: "secret123".into(),
        };
        assert!(valid.validate().is_ok());

        let weak = RegisterRequest { password: "onlyletters".into(), ..valid.clone() };
        assert!(weak.validate().is_err());

        let bad_email = RegisterRequest { email: "nope".into(), ..valid };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_profile_patch_camel_case() {
        let json = r#"{ "bio": "مطور", "preferences": { "emailNotifications": false, "language": "en" } }"#;
        let req: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        let prefs = req.preferences.unwrap();
        assert_eq!(prefs.email_notifications, Some(false));
        assert_eq!(prefs.language, Some(Language::En));
    }
}
