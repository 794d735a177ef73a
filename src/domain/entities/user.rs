use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Platform roles. Stored lowercase, compared as an enum everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Instructor,
    Organization,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Instructor => "instructor",
            UserRole::Organization => "organization",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "instructor" => Some(UserRole::Instructor),
            "organization" => Some(UserRole::Organization),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: Language::Ar,
            email_notifications: true,
            theme: Theme::Light,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
    pub is_active: bool,
    pub is_email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// New local account with the default `user` role
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            email,
            password_hash,
            role: UserRole::User,
            avatar: None,
            bio: None,
            phone: None,
            location: None,
            interests: Vec::new(),
            skills: Vec::new(),
            preferences: UserPreferences::default(),
            is_active: true,
            is_email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("سارة".into(), "sara@example.com".into(), "hash".into());
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert_eq!(user.preferences.language, Language::Ar);
        assert!(user.preferences.email_notifications);
    }

    #[test]
    fn test_role_parse_and_serde() {
        assert_eq!(UserRole::parse(" Organization "), Some(UserRole::Organization));
        assert_eq!(UserRole::parse("root"), None);
        assert_eq!(serde_json::to_string(&UserRole::Instructor).unwrap(), "\"instructor\"");
    }
}
