use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::reactions::Reactions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post: ObjectId,
    pub author: ObjectId,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    #[serde(flatten)]
    pub reactions: Reactions,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Comment {
    pub fn new(post: ObjectId, author: ObjectId, content: String, parent: Option<ObjectId>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            post,
            author,
            content,
            parent,
            reactions: Reactions::default(),
            is_edited: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.author == *user
    }
}
