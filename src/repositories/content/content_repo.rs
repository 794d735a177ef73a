//! # Content repository
//!
//! CMS blocks keyed by a unique `key`. Public reads only see published
//! blocks; every update bumps `version`.
//!
//! ```rust,ignore
//! let hero = ContentRepository::instance().find_published_by_key("home.hero").await?;
//! ```

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
use crate::domain::entities::content::Content;
use crate::repositories::{find_all, find_page, with_search};

#[repository(name = "content", collection = "contents")]
pub struct ContentRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ContentRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Content>, AppError> {
        Ok(self.collection::<Content>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    pub async fn find_published_by_key(&self, key: &str) -> Result<Option<Content>, AppError> {
        Ok(self.collection::<Content>()
            .find_one(doc! { "key": key, "is_published": true })
            .await?)
    }

    pub async fn find_published_by_page(&self, page: &str) -> Result<Vec<Content>, AppError> {
        find_all(
            &self.collection::<Content>(),
            doc! { "page": page, "is_published": true },
            doc! { "section": 1, "key": 1 },
            0,
        )
        .await
    }

    /// Duplicate keys surface as `DuplicateError`
    pub async fn create(&self, mut content: Content) -> Result<Content, AppError> {
        let result = self.collection::<Content>()
            .insert_one(&content)
            .await?;

        content.id = result.inserted_id.as_object_id();
        Ok(content)
    }

    /// `$set` plus `$inc: { version: 1 }`
    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Content>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Content>()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": fields, "$inc": { "version": 1 } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Content>()
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Content>, AppError> {
        let filter = with_search(filter, &["key", "title.ar", "title.en"], query);
        let sort = query.sort_document(&["key", "page", "updated_at"], doc! { "page": 1, "section": 1, "key": 1 });
        find_page(&self.collection::<Content>(), filter, sort, query).await
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let key_index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("key_unique".to_string())
                .build())
            .build();

        let page_index = IndexModel::builder()
            .keys(doc! { "page": 1, "section": 1 })
            .options(IndexOptions::builder()
                .name("page_section".to_string())
                .build())
            .build();

        self.collection::<Content>()
            .create_indexes([key_index, page_index])
            .await?;

        Ok(())
    }
}
