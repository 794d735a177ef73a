//! # Program repository
//!
//! Programs are cached by id like users. Enrollment is a single conditional
//! `$addToSet` so concurrent enrollments can neither duplicate a participant
//! nor overshoot `max_participants`.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::{RedisClient, DEFAULT_TTL_SECONDS};
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::entities::program::{Program, RatingSnapshot};
use crate::repositories::{find_all, find_page, ids_filter, with_search};

#[repository(name = "program", collection = "programs")]
pub struct ProgramRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ProgramRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Program>, AppError> {
        let cache_key = self.cache_key(&id.to_hex());

        if let Ok(Some(cached)) = self.redis.get::<Program>(&cache_key).await {
            return Ok(Some(cached));
        }

        let program = self.collection::<Program>()
            .find_one(doc! { "_id": id })
            .await?;

        if let Some(ref program) = program {
            let _ = self.redis
                .set_with_expiry(&cache_key, program, DEFAULT_TTL_SECONDS as usize)
                .await;
        }

        Ok(program)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Program>, AppError> {
        Ok(self.collection::<Program>()
            .find_one(doc! { "slug": slug })
            .await?)
    }

    /// `GET /programs/{id}` accepts either a hex id or a slug
    pub async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Program>, AppError> {
        match ObjectId::parse_str(key) {
            Ok(id) => self.find_by_id(id).await,
            Err(_) => self.find_by_slug(key).await,
        }
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Program>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.collection::<Program>(), ids_filter(ids), doc! {}, 0).await
    }

    pub async fn create(&self, program: Program) -> Result<Program, AppError> {
        self.collection::<Program>()
            .insert_one(&program)
            .await?;
        Ok(program)
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Program>, AppError> {
        fields.insert("updated_at", DateTime::now());

        let updated = self.collection::<Program>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Program>()
            .delete_one(doc! { "_id": id })
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(result.deleted_count > 0)
    }

    /// Adds `user` to an active program that still has room.
    /// `false` when any condition failed at write time.
    pub async fn add_participant(&self, id: ObjectId, user: ObjectId) -> Result<bool, AppError> {
        let filter = doc! {
            "_id": id,
            "is_active": true,
            "participants": { "$ne": user },
            "$or": [
                { "max_participants": null },
                { "$expr": { "$lt": [{ "$size": "$participants" }, "$max_participants"] } },
            ],
        };
        let update = doc! {
            "$addToSet": { "participants": user },
            "$set": { "updated_at": DateTime::now() },
        };

        let result = self.collection::<Program>()
            .update_one(filter, update)
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(result.modified_count > 0)
    }

    pub async fn remove_participant(&self, id: ObjectId, user: ObjectId) -> Result<(), AppError> {
        self.collection::<Program>()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "participants": user } })
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(())
    }

    pub async fn set_ratings(&self, id: ObjectId, ratings: &RatingSnapshot) -> Result<(), AppError> {
        self.collection::<Program>()
            .update_one(doc! { "_id": id }, doc! { "$set": { "ratings": to_bson(ratings)? } })
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(())
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Program>, AppError> {
        let filter = with_search(filter, &["title", "description", "tags"], query);
        let sort = query.sort_document(
            &["title", "created_at", "start_date", "price", "ratings.average", "duration_hours"],
            doc! { "is_featured": -1, "created_at": -1 },
        );
        find_page(&self.collection::<Program>(), filter, sort, query).await
    }

    /// Active programs in `categories`, skipping `exclude`
    pub async fn find_recommended(
        &self,
        categories: &[String],
        exclude: &[ObjectId],
        limit: i64,
    ) -> Result<Vec<Program>, AppError> {
        let filter = doc! {
            "category": { "$in": categories.to_vec() },
            "is_active": true,
            "_id": { "$nin": exclude.to_vec() },
        };
        find_all(
            &self.collection::<Program>(),
            filter,
            doc! { "ratings.average": -1, "created_at": -1 },
            limit,
        )
        .await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Program>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("slug_unique".to_string())
                .build())
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "is_active": 1 })
            .options(IndexOptions::builder()
                .name("category_active".to_string())
                .build())
            .build();

        let instructor_index = IndexModel::builder()
            .keys(doc! { "instructor": 1 })
            .options(IndexOptions::builder()
                .name("instructor".to_string())
                .build())
            .build();

        self.collection::<Program>()
            .create_indexes([slug_index, category_index, instructor_index])
            .await?;

        Ok(())
    }
}
