use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::reactions::Reactions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    pub author: ObjectId,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime>,
    #[serde(flatten)]
    pub reactions: Reactions,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Post {
    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.author == *user
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Sets the status, stamping `published_at` on the first publication
    pub fn set_status(&mut self, status: PostStatus, now: DateTime) {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
    }
}

/// First `max_chars` characters of the body, used when no excerpt is given
pub fn excerpt_from(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_handles_multibyte() {
        let body = "مرحبا بكم في منصة الشباب";
        assert_eq!(excerpt_from(body, 100), body);
        assert_eq!(excerpt_from(body, 5), "مرحبا...");
    }

    #[test]
    fn test_publish_stamps_once() {
        let first = DateTime::from_millis(1_000);
        let mut post = Post {
            id: None,
            title: "t".into(),
            slug: "t".into(),
            content: "c".into(),
            excerpt: String::new(),
            author: ObjectId::new(),
            category: "news".into(),
            tags: vec![],
            status: PostStatus::Draft,
            published_at: None,
            reactions: Reactions::default(),
            views: 0,
            comments_count: 0,
            is_featured: false,
            is_deleted: false,
            created_at: first,
            updated_at: first,
        };

        post.set_status(PostStatus::Published, first);
        post.set_status(PostStatus::Archived, DateTime::from_millis(2_000));
        post.set_status(PostStatus::Published, DateTime::from_millis(3_000));
        assert_eq!(post.published_at, Some(first));
    }
}
