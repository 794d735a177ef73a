//! # Post repository
//!
//! Posts are addressed by id or slug and soft deleted. View and comment
//! counters move with `$inc` only, never read-modify-write.

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
use crate::domain::entities::post::Post;
use crate::domain::entities::reactions::{ReactionChange, ReactionKind};
use crate::repositories::{find_page, toggle_reaction, with_search};

#[repository(name = "post", collection = "posts")]
pub struct PostRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl PostRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Post>, AppError> {
        Ok(self.collection::<Post>()
            .find_one(doc! { "_id": id, "is_deleted": false })
            .await?)
    }

    pub async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Post>, AppError> {
        let filter = match ObjectId::parse_str(key) {
            Ok(id) => doc! { "_id": id, "is_deleted": false },
            Err(_) => doc! { "slug": key, "is_deleted": false },
        };
        Ok(self.collection::<Post>().find_one(filter).await?)
    }

    pub async fn create(&self, post: Post) -> Result<Post, AppError> {
        self.collection::<Post>()
            .insert_one(&post)
            .await?;
        Ok(post)
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Post>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Post>()
            .find_one_and_update(doc! { "_id": id, "is_deleted": false }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn soft_delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Post>()
            .update_one(
                doc! { "_id": id, "is_deleted": false },
                doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    /// Atomic `$inc` of the view counter; returns the post after the bump
    pub async fn increment_views(&self, id: ObjectId) -> Result<Option<Post>, AppError> {
        Ok(self.collection::<Post>()
            .find_one_and_update(doc! { "_id": id, "is_deleted": false }, doc! { "$inc": { "views": 1 } })
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// `delta` may be negative; the counter stays at or above zero
    pub async fn adjust_comments_count(&self, id: ObjectId, delta: i64) -> Result<(), AppError> {
        let filter = if delta < 0 {
            doc! { "_id": id, "comments_count": { "$gte": -delta } }
        } else {
            doc! { "_id": id }
        };

        self.collection::<Post>()
            .update_one(filter, doc! { "$inc": { "comments_count": delta } })
            .await?;
        Ok(())
    }

    pub async fn toggle_reaction(&self, post: &Post, user: ObjectId, kind: ReactionKind) -> Result<ReactionChange, AppError> {
        let id = post.id.ok_or_else(|| AppError::NotFound("المنشور غير موجود".to_string()))?;
        toggle_reaction(&self.collection::<Post>(), id, &post.reactions, user, kind).await
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Post>, AppError> {
        let filter = with_search(filter, &["title", "content", "tags"], query);
        let sort = query.sort_document(
            &["title", "created_at", "published_at", "views", "comments_count"],
            doc! { "is_featured": -1, "published_at": -1, "created_at": -1 },
        );
        find_page(&self.collection::<Post>(), filter, sort, query).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Post>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("slug_unique".to_string())
                .build())
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "is_deleted": 1, "published_at": -1 })
            .options(IndexOptions::builder()
                .name("status_published".to_string())
                .build())
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author": 1 })
            .options(IndexOptions::builder()
                .name("author".to_string())
                .build())
            .build();

        let tags_index = IndexModel::builder()
            .keys(doc! { "tags": 1 })
            .options(IndexOptions::builder()
                .name("tags".to_string())
                .build())
            .build();

        self.collection::<Post>()
            .create_indexes([slug_index, status_index, author_index, tags_index])
            .await?;

        Ok(())
    }
}
