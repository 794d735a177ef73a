use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::comment::Comment;
use crate::domain::entities::post::{Post, PostStatus};
use crate::domain::entities::reactions::Reactions;
use crate::utils::datetime::{to_chrono, to_chrono_opt};

/// Counters plus the caller's own reaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub likes: usize,
    pub dislikes: usize,
    pub liked_by_me: bool,
    pub disliked_by_me: bool,
}

impl ReactionSummary {
    pub fn new(reactions: &Reactions, viewer: Option<&ObjectId>) -> Self {
        Self {
            likes: reactions.like_count(),
            dislikes: reactions.dislike_count(),
            liked_by_me: viewer.is_some_and(|v| reactions.likes.contains(v)),
            disliked_by_me: viewer.is_some_and(|v| reactions.dislikes.contains(v)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: UserRef,
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub reactions: ReactionSummary,
    pub views: i64,
    pub comments_count: i64,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(post: Post, users: &UserSummaries, viewer: Option<&ObjectId>) -> Self {
        Self {
            id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
            author: UserRef::resolve(&post.author, users),
            reactions: ReactionSummary::new(&post.reactions, viewer),
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            category: post.category,
            tags: post.tags,
            status: post.status,
            published_at: to_chrono_opt(post.published_at),
            views: post.views,
            comments_count: post.comments_count,
            is_featured: post.is_featured,
            created_at: to_chrono(post.created_at),
            updated_at: to_chrono(post.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post: String,
    pub author: UserRef,
    pub content: String,
    pub parent: Option<String>,
    pub reactions: ReactionSummary,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, users: &UserSummaries, viewer: Option<&ObjectId>) -> Self {
        Self {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            post: comment.post.to_hex(),
            author: UserRef::resolve(&comment.author, users),
            reactions: ReactionSummary::new(&comment.reactions, viewer),
            content: comment.content,
            parent: comment.parent.map(|id| id.to_hex()),
            is_edited: comment.is_edited,
            created_at: to_chrono(comment.created_at),
            updated_at: to_chrono(comment.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::reactions::ReactionKind;

    #[test]
    fn test_reaction_summary_for_viewer() {
        let viewer = ObjectId::new();
        let mut reactions = Reactions::default();
        reactions.toggle(viewer, ReactionKind::Dislike);
        reactions.toggle(ObjectId::new(), ReactionKind::Like);

        let summary = ReactionSummary::new(&reactions, Some(&viewer));
        assert_eq!((summary.likes, summary.dislikes), (1, 1));
        assert!(summary.disliked_by_me);
        assert!(!summary.liked_by_me);

        let anonymous = ReactionSummary::new(&reactions, None);
        assert!(!anonymous.disliked_by_me);
    }
}
