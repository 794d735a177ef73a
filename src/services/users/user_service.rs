//! # User service
//!
//! Own profile, password change, public profiles and the admin user
//! management endpoints.

use std::sync::Arc;

use bcrypt::{hash, verify};
use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use singleton_macro::service;

use crate::config::PasswordConfig;
use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::users::{
    ChangePasswordRequest, PreferencesPatch, PublicUserResponse, UpdateProfileRequest, UserFilter,
    UserResponse,
};
use crate::domain::entities::user::{User, UserRole};
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::string_utils::{clean_optional_string, normalize_tags, validate_required_string};

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub async fn find_user(&self, id: ObjectId) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("المستخدم غير موجود".to_string()))
    }

    pub async fn get_me(&self, id: ObjectId) -> Result<UserResponse, AppError> {
        Ok(UserResponse::from(self.find_user(id).await?))
    }

    pub async fn get_public_profile(&self, id: ObjectId) -> Result<PublicUserResponse, AppError> {
        let user = self.find_user(id).await?;
        if !user.is_active {
            return Err(AppError::NotFound("المستخدم غير موجود".to_string()));
        }
        Ok(PublicUserResponse::from(user))
    }

    pub async fn update_profile(&self, id: ObjectId, request: UpdateProfileRequest) -> Result<UserResponse, AppError> {
        let fields = profile_update_document(request)?;
        if fields.is_empty() {
            return self.get_me(id).await;
        }

        let user = self.user_repo
            .update_fields(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("المستخدم غير موجود".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn change_password(&self, id: ObjectId, request: ChangePasswordRequest) -> Result<(), AppError> {
        let user = self.find_user(id).await?;

        let matches = verify(&request.current_password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("password verification failed: {}", e)))?;
        if !matches {
            return Err(AppError::ValidationError("كلمة المرور الحالية غير صحيحة".to_string()));
        }

        let password_hash = hash(&request.new_password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("password hashing failed: {}", e)))?;

        self.user_repo
            .update_fields(id, doc! { "password_hash": password_hash })
            .await?;

        log::info!("password changed for user {}", id.to_hex());
        Ok(())
    }

    pub async fn list_users(&self, filter: UserFilter, query: &PageQuery) -> Result<Page<UserResponse>, AppError> {
        let mut mongo_filter = doc! {};
        if let Some(role) = filter.role {
            mongo_filter.insert("role", role.as_str());
        }
        if let Some(is_active) = filter.is_active {
            mongo_filter.insert("is_active", is_active);
        }

        let page = self.user_repo.find_page(mongo_filter, query).await?;
        Ok(page.map(UserResponse::from))
    }

    pub async fn update_role(&self, actor: ObjectId, id: ObjectId, role: UserRole) -> Result<UserResponse, AppError> {
        if actor == id && role != UserRole::Admin {
            return Err(AppError::ValidationError("لا يمكنك تغيير صلاحياتك بنفسك".to_string()));
        }

        let user = self.user_repo
            .update_fields(id, doc! { "role": role.as_str() })
            .await?
            .ok_or_else(|| AppError::NotFound("المستخدم غير موجود".to_string()))?;

        log::info!("user {} role set to {} by {}", id.to_hex(), role.as_str(), actor.to_hex());
        Ok(UserResponse::from(user))
    }

    pub async fn update_status(&self, actor: ObjectId, id: ObjectId, is_active: bool) -> Result<UserResponse, AppError> {
        if actor == id && !is_active {
            return Err(AppError::ValidationError("لا يمكنك تعطيل حسابك".to_string()));
        }

        let user = self.user_repo
            .update_fields(id, doc! { "is_active": is_active })
            .await?
            .ok_or_else(|| AppError::NotFound("المستخدم غير موجود".to_string()))?;

        log::info!("user {} active={} by {}", id.to_hex(), is_active, actor.to_hex());
        Ok(UserResponse::from(user))
    }
}

/// `$set` document for a profile patch; absent fields are left untouched
fn profile_update_document(request: UpdateProfileRequest) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(name) = request.name {
        fields.insert("name", validate_required_string(&name, "الاسم")?);
    }
    if let Some(avatar) = request.avatar {
        fields.insert("avatar", to_bson(&clean_optional_string(Some(avatar)))?);
    }
    if let Some(bio) = request.bio {
        fields.insert("bio", to_bson(&clean_optional_string(Some(bio)))?);
    }
    if let Some(phone) = request.phone {
        fields.insert("phone", to_bson(&clean_optional_string(Some(phone)))?);
    }
    if let Some(location) = request.location {
        fields.insert("location", to_bson(&clean_optional_string(Some(location)))?);
    }
    if let Some(interests) = request.interests {
        fields.insert("interests", normalize_tags(interests));
    }
    if let Some(skills) = request.skills {
        fields.insert("skills", normalize_tags(skills));
    }
    if let Some(preferences) = request.preferences {
        fields.extend(preferences_update_document(preferences)?);
    }

    Ok(fields)
}

fn preferences_update_document(patch: PreferencesPatch) -> Result<Document, AppError> {
    let mut fields = Document::new();
    if let Some(language) = patch.language {
        fields.insert("preferences.language", to_bson(&language)?);
    }
    if let Some(email_notifications) = patch.email_notifications {
        fields.insert("preferences.email_notifications", email_notifications);
    }
    if let Some(theme) = patch.theme {
        fields.insert("preferences.theme", to_bson(&theme)?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::Language;

    #[test]
    fn test_profile_patch_only_sets_present_fields() {
        let request = UpdateProfileRequest {
            bio: Some("  مطور  ".into()),
            interests: Some(vec!["Tech".into(), "tech".into(), " ".into()]),
            preferences: Some(PreferencesPatch { language: Some(Language::En), ..Default::default() }),
            ..Default::default()
        };

        let fields = profile_update_document(request).unwrap();
        assert_eq!(fields.get_str("bio").unwrap(), "مطور");
        assert_eq!(fields.get_array("interests").unwrap().len(), 1);
        assert_eq!(fields.get_str("preferences.language").unwrap(), "en");
        assert!(!fields.contains_key("name"));
        assert!(!fields.contains_key("preferences.theme"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let request = UpdateProfileRequest { name: Some("   ".into()), ..Default::default() };
        assert!(matches!(profile_update_document(request), Err(AppError::ValidationError(_))));
    }
}
