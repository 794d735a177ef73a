use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::reactions::Reactions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub program: ObjectId,
    pub author: ObjectId,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    #[serde(flatten)]
    pub reactions: Reactions,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Review {
    pub fn new(program: ObjectId, author: ObjectId, rating: i32, title: Option<String>, comment: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            program,
            author,
            rating,
            title,
            comment,
            reactions: Reactions::default(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.author == *user
    }
}
