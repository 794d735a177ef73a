//! # Comment repository
//!
//! Comments are never removed: `soft_delete` flips `is_deleted` and listings
//! filter on it. The post's `comments_count` is maintained by the caller
//! through `PostRepository::adjust_comments_count`, and only when
//! `soft_delete` reports that this request did the flip.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::entities::comment::Comment;
use crate::domain::entities::reactions::{ReactionChange, ReactionKind};
use crate::repositories::{find_page, toggle_reaction};

#[repository(name = "comment", collection = "comments")]
pub struct CommentRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl CommentRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Comment>, AppError> {
        Ok(self.collection::<Comment>()
            .find_one(doc! { "_id": id, "is_deleted": false })
            .await?)
    }

    pub async fn create(&self, mut comment: Comment) -> Result<Comment, AppError> {
        let result = self.collection::<Comment>()
            .insert_one(&comment)
            .await?;

        comment.id = result.inserted_id.as_object_id();
        Ok(comment)
    }

    pub async fn update_content(&self, id: ObjectId, content: &str) -> Result<Option<Comment>, AppError> {
        Ok(self.collection::<Comment>()
            .find_one_and_update(
                doc! { "_id": id, "is_deleted": false },
                doc! { "$set": { "content": content, "is_edited": true, "updated_at": DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// `true` only for the request that actually flipped the flag
    pub async fn soft_delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Comment>()
            .update_one(
                doc! { "_id": id, "is_deleted": false },
                doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    pub async fn find_page_for_post(&self, post: ObjectId, query: &PageQuery) -> Result<Page<Comment>, AppError> {
        let filter = doc! { "post": post, "is_deleted": false };
        let sort = query.sort_document(&["created_at"], doc! { "created_at": 1 });
        find_page(&self.collection::<Comment>(), filter, sort, query).await
    }

    pub async fn toggle_reaction(&self, comment: &Comment, user: ObjectId, kind: ReactionKind) -> Result<ReactionChange, AppError> {
        let id = comment.id.ok_or_else(|| AppError::NotFound("التعليق غير موجود".to_string()))?;
        toggle_reaction(&self.collection::<Comment>(), id, &comment.reactions, user, kind).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Comment>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let post_index = IndexModel::builder()
            .keys(doc! { "post": 1, "is_deleted": 1, "created_at": 1 })
            .options(IndexOptions::builder()
                .name("post_created".to_string())
                .build())
            .build();

        self.collection::<Comment>()
            .create_indexes([post_index])
            .await?;

        Ok(())
    }
}
