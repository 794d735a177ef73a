//! Achievement catalog. Seeded with the defaults at startup, managed
//! from the admin API afterwards.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::achievement::Achievement;
use crate::repositories::{find_all, ids_filter};

#[repository(name = "achievement", collection = "achievements")]
pub struct AchievementRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl AchievementRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Achievement>, AppError> {
        Ok(self.collection::<Achievement>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Achievement>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.collection::<Achievement>(), ids_filter(ids), doc! {}, 0).await
    }

    /// Catalog evaluated after every enrollment / progress report
    pub async fn find_active(&self) -> Result<Vec<Achievement>, AppError> {
        find_all(
            &self.collection::<Achievement>(),
            doc! { "is_active": true },
            doc! { "category": 1, "requirements.value": 1 },
            0,
        )
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<Achievement>, AppError> {
        find_all(&self.collection::<Achievement>(), doc! {}, doc! { "category": 1, "requirements.value": 1 }, 0).await
    }

    pub async fn create(&self, mut achievement: Achievement) -> Result<Achievement, AppError> {
        let result = self.collection::<Achievement>()
            .insert_one(&achievement)
            .await?;

        achievement.id = result.inserted_id.as_object_id();
        Ok(achievement)
    }

    pub async fn insert_many(&self, achievements: &[Achievement]) -> Result<usize, AppError> {
        if achievements.is_empty() {
            return Ok(0);
        }
        let result = self.collection::<Achievement>()
            .insert_many(achievements)
            .await?;
        Ok(result.inserted_ids.len())
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Achievement>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Achievement>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Achievement>()
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Achievement>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        self.collection::<Achievement>()
            .create_indexes([name_index])
            .await?;

        Ok(())
    }
}
