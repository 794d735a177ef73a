use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::dto::posts::ReactionSummary;
use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::review::Review;
use crate::utils::datetime::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub program: String,
    pub author: UserRef,
    pub rating: i32,
    pub title: Option<String>,
    pub comment: String,
    pub reactions: ReactionSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn new(review: Review, users: &UserSummaries, viewer: Option<&ObjectId>) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            program: review.program.to_hex(),
            author: UserRef::resolve(&review.author, users),
            reactions: ReactionSummary::new(&review.reactions, viewer),
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            created_at: to_chrono(review.created_at),
            updated_at: to_chrono(review.updated_at),
        }
    }
}
