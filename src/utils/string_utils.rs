//! # String helpers
//!
//! Normalization used by DTO deserialization and by the slug "pre-save hook"
//! of programs and posts.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::core::errors::AppError;

/// Maximum slug length before the uniqueness suffix is appended
const SLUG_MAX_LEN: usize = 80;

/// Trims `value`, failing when nothing is left
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("الحقل {} مطلوب", field_name)));
    }
    Ok(trimmed.to_string())
}

/// `Some("  ")` and `None` both collapse to `None`
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde helper: trims optional strings and maps blanks to `None`
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// Lowercases and trims an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims, drops blanks and de-duplicates a tag-like list, keeping order
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Builds a URL slug from a title.
///
/// Letters and digits of any script are kept (Arabic titles produce Arabic
/// slugs), everything else collapses into single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }

        if slug.chars().count() >= SLUG_MAX_LEN {
            break;
        }
    }

    slug
}

/// Slug with a short suffix derived from the document id, so two programs
/// with the same title never collide
pub fn unique_slug(title: &str, id_hex: &str) -> String {
    let suffix = &id_hex[id_hex.len().saturating_sub(6)..];
    let base = slugify(title);
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// Escapes regex metacharacters so user search input is matched literally
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Parses a path/body id, mapping malformed input to a 400
pub fn parse_object_id(value: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value.trim()).map_err(|_| AppError::invalid_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  World  ", "name").unwrap(), "World");
        assert!(validate_required_string("", "name").is_err());
        assert!(validate_required_string("\t\n", "name").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Hi  ".to_string())), Some("Hi".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct ProfilePatch {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            bio: Option<String>,
        }

        let patch: ProfilePatch = serde_json::from_str(r#"{"bio": "  hello  "}"#).unwrap();
        assert_eq!(patch.bio, Some("hello".to_string()));

        let patch: ProfilePatch = serde_json::from_str(r#"{"bio": "   "}"#).unwrap();
        assert_eq!(patch.bio, None);

        let patch: ProfilePatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.bio, None);
    }

    #[test]
    fn test_slugify_latin_and_arabic() {
        assert_eq!(slugify("  Intro to Rust: Part 1! "), "intro-to-rust-part-1");
        assert_eq!(slugify("برنامج القيادة الشبابية"), "برنامج-القيادة-الشبابية");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_unique_slug_appends_id_suffix() {
        assert_eq!(unique_slug("Leadership Camp", "65f1a2b3c4d5e6f7a8b9c0d1"), "leadership-camp-b9c0d1");
        assert_eq!(unique_slug("!!!", "65f1a2b3c4d5e6f7a8b9c0d1"), "b9c0d1");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![" Rust ".to_string(), "rust".to_string(), "".to_string(), "Web".to_string()];
        assert_eq!(normalize_tags(tags), vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("c++ (intro)"), "c\\+\\+ \\(intro\\)");
        assert_eq!(normalize_email("  Sara@Example.COM "), "sara@example.com");
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(parse_object_id("not-an-id"), Err(AppError::ValidationError(_))));
    }
}
