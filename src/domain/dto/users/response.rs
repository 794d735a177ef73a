use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::entities::user::{User, UserPreferences, UserRole};
use crate::utils::datetime::{to_chrono, to_chrono_opt};

/// Own profile; everything except the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub preferences: UserPreferences,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let id = user.id_string();
        let User {
            name,
            email,
            role,
            avatar,
            bio,
            phone,
            location,
            interests,
            skills,
            preferences,
            is_active,
            is_email_verified,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id,
            name,
            email,
            role,
            avatar,
            bio,
            phone,
            location,
            interests,
            skills,
            preferences,
            is_active,
            is_email_verified,
            last_login_at: to_chrono_opt(last_login_at),
            created_at: to_chrono(created_at),
            updated_at: to_chrono(updated_at),
        }
    }
}

/// Profile visible to other users
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserResponse {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name,
            role: user.role,
            avatar: user.avatar,
            bio: user.bio,
            location: user.location,
            interests: user.interests,
            skills: user.skills,
            created_at: to_chrono(user.created_at),
        }
    }
}

/// Populated reference (author, instructor, applicant, ...)
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A user reference: populated when the user was loaded, the bare id otherwise
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserSummary),
    Id(String),
}

/// Users map as returned by `UserRepository::summaries`
pub type UserSummaries = HashMap<ObjectId, UserSummary>;

impl UserRef {
    pub fn resolve(id: &ObjectId, users: &UserSummaries) -> Self {
        match users.get(id) {
            Some(summary) => UserRef::Populated(summary.clone()),
            None => UserRef::Id(id.to_hex()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password() {
        let mut user = User::new("سارة".into(), "sara@example.com".into(), "$2b$hash".into());
        user.id = Some(mongodb::bson::oid::ObjectId::new());

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("hash"));
        assert!(json.contains("isEmailVerified"));
    }
}
