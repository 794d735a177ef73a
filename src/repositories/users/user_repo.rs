//! # User repository
//!
//! `users` collection. Lookups by id go through Redis because the auth
//! middleware resolves the caller on every authenticated request; every
//! write invalidates that entry.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::{RedisClient, DEFAULT_TTL_SECONDS};
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::users::{UserSummaries, UserSummary};
use crate::domain::entities::user::User;
use crate::repositories::{find_all, find_page, ids_filter, with_search};

#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    /// Cached by id for [`DEFAULT_TTL_SECONDS`]
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        let cache_key = self.cache_key(&id.to_hex());

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": id })
            .await?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, DEFAULT_TTL_SECONDS as usize)
                .await;
        }

        Ok(user)
    }

    /// Uncached: login must always see the current password hash
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection::<User>()
            .find_one(doc! { "email": email })
            .await?)
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        let result = self.collection::<User>()
            .insert_one(&user)
            .await?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// `$set` of `fields` plus `updated_at`; returns the updated document
    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<User>, AppError> {
        fields.insert("updated_at", DateTime::now());

        let updated = self.collection::<User>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(updated)
    }

    pub async fn touch_last_login(&self, id: ObjectId) -> Result<(), AppError> {
        self.collection::<User>()
            .update_one(doc! { "_id": id }, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await?;

        let _ = self.invalidate_cache(&id.to_hex()).await;
        Ok(())
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<User>, AppError> {
        let filter = with_search(filter, &["name", "email"], query);
        let sort = query.sort_document(&["name", "email", "created_at", "last_login_at"], doc! { "created_at": -1 });
        find_page(&self.collection::<User>(), filter, sort, query).await
    }

    /// Populates author / instructor references in list responses
    pub async fn summaries(&self, ids: &[ObjectId]) -> Result<UserSummaries, AppError> {
        if ids.is_empty() {
            return Ok(UserSummaries::new());
        }

        let users = find_all(&self.collection::<User>(), ids_filter(ids), doc! {}, 0).await?;
        Ok(users
            .iter()
            .filter_map(|user| user.id.map(|id| (id, UserSummary::from(user))))
            .collect())
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<User>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "is_active": 1 })
            .options(IndexOptions::builder()
                .name("role_active".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection::<User>()
            .create_indexes([email_index, role_index, created_at_index])
            .await?;

        Ok(())
    }
}
