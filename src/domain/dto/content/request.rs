use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::content::LocalizedText;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    #[validate(length(min = 2, max = 100, message = "المفتاح يجب أن يكون بين 2 و 100 حرف"))]
    #[validate(custom(function = "validate_key"))]
    pub key: String,

    #[validate(length(min = 1, max = 50, message = "اسم الصفحة مطلوب"))]
    pub page: String,

    pub section: Option<String>,
    pub title: Option<LocalizedText>,
    pub body: Option<LocalizedText>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    #[validate(length(min = 1, max = 50, message = "اسم الصفحة مطلوب"))]
    pub page: Option<String>,

    pub section: Option<String>,
    pub title: Option<LocalizedText>,
    pub body: Option<LocalizedText>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFilter {
    pub page: Option<String>,
    pub section: Option<String>,
}

fn validate_key(key: &str) -> Result<(), ValidationError> {
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Err(ValidationError::new("invalid_key")
            .with_message("المفتاح يجب أن يحتوي على حروف إنجليزية وأرقام فقط".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_charset() {
        let json = r#"{ "key": "home.hero", "page": "home", "title": { "ar": "مرحبا", "en": "Welcome" } }"#;
        let req: CreateContentRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());

        let bad = CreateContentRequest { key: "home hero".into(), ..req };
        assert!(bad.validate().is_err());
    }
}
