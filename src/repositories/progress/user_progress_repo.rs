//! # User progress repository
//!
//! Whole-document saves guarded by the `version` field: a save only lands
//! when nobody else saved since the document was read.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::user_progress::UserProgress;

#[repository(name = "userprogress", collection = "user_progress")]
pub struct UserProgressRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserProgressRepository {
    pub async fn find_by_user(&self, user: ObjectId) -> Result<Option<UserProgress>, AppError> {
        Ok(self.collection::<UserProgress>()
            .find_one(doc! { "user": user })
            .await?)
    }

    /// Fails with `DuplicateError` when another request created it first
    pub async fn create(&self, mut progress: UserProgress) -> Result<UserProgress, AppError> {
        let result = self.collection::<UserProgress>()
            .insert_one(&progress)
            .await?;

        progress.id = result.inserted_id.as_object_id();
        Ok(progress)
    }

    /// Replaces the stored document if its version is still
    /// `progress.version`. On success the in-memory version is bumped;
    /// `false` means the caller lost a race and must reload.
    pub async fn save_versioned(&self, progress: &mut UserProgress) -> Result<bool, AppError> {
        let id = progress
            .id
            .ok_or_else(|| AppError::InternalError("progress document has no id".to_string()))?;
        let expected = progress.version;

        let mut next = progress.clone();
        next.version = expected + 1;
        next.updated_at = DateTime::now();

        let result = self.collection::<UserProgress>()
            .replace_one(doc! { "_id": id, "version": expected }, &next)
            .await?;

        if result.matched_count == 0 {
            return Ok(false);
        }

        *progress = next;
        Ok(true)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<UserProgress>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("user_unique".to_string())
                .build())
            .build();

        self.collection::<UserProgress>()
            .create_indexes([user_index])
            .await?;

        Ok(())
    }
}
