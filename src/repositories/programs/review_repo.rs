//! # Review repository
//!
//! Also owns the rating histogram aggregation used to refresh the
//! denormalized snapshot on the program.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::entities::reactions::{ReactionChange, ReactionKind};
use crate::domain::entities::review::Review;
use crate::repositories::{find_page, toggle_reaction};

#[repository(name = "review", collection = "reviews")]
pub struct ReviewRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ReviewRepository {
    /// Soft-deleted reviews are invisible
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self.collection::<Review>()
            .find_one(doc! { "_id": id, "is_deleted": false })
            .await?)
    }

    pub async fn find_by_author_and_program(&self, author: ObjectId, program: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self.collection::<Review>()
            .find_one(doc! { "author": author, "program": program, "is_deleted": false })
            .await?)
    }

    /// Duplicate `(author, program)` surfaces as `DuplicateError`
    pub async fn create(&self, mut review: Review) -> Result<Review, AppError> {
        let result = self.collection::<Review>()
            .insert_one(&review)
            .await?;

        review.id = result.inserted_id.as_object_id();
        Ok(review)
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Review>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Review>()
            .find_one_and_update(doc! { "_id": id, "is_deleted": false }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn soft_delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Review>()
            .update_one(
                doc! { "_id": id, "is_deleted": false },
                doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    pub async fn find_page_for_program(&self, program: ObjectId, query: &PageQuery) -> Result<Page<Review>, AppError> {
        let filter = doc! { "program": program, "is_deleted": false };
        let sort = query.sort_document(&["rating", "created_at"], doc! { "created_at": -1 });
        find_page(&self.collection::<Review>(), filter, sort, query).await
    }

    /// `(rating, count)` pairs of the program's live reviews
    pub async fn rating_histogram(&self, program: ObjectId) -> Result<Vec<(i32, i64)>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "program": program, "is_deleted": false } },
            doc! { "$group": { "_id": "$rating", "count": { "$sum": 1 } } },
        ];

        let groups: Vec<Document> = self.collection::<Review>()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        Ok(groups.iter().filter_map(histogram_entry).collect())
    }

    pub async fn toggle_reaction(&self, review: &Review, user: ObjectId, kind: ReactionKind) -> Result<ReactionChange, AppError> {
        let id = review.id.ok_or_else(|| AppError::NotFound("التقييم غير موجود".to_string()))?;
        toggle_reaction(&self.collection::<Review>(), id, &review.reactions, user, kind).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Review>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        // A soft-deleted review does not block writing a new one
        let author_program_index = IndexModel::builder()
            .keys(doc! { "author": 1, "program": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "is_deleted": false })
                .name("author_program_unique".to_string())
                .build())
            .build();

        let program_index = IndexModel::builder()
            .keys(doc! { "program": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("program_created".to_string())
                .build())
            .build();

        self.collection::<Review>()
            .create_indexes([author_program_index, program_index])
            .await?;

        Ok(())
    }
}

fn histogram_entry(group: &Document) -> Option<(i32, i64)> {
    let rating = match group.get("_id")? {
        Bson::Int32(n) => *n,
        Bson::Int64(n) => *n as i32,
        Bson::Double(n) => *n as i32,
        _ => return None,
    };
    let count = match group.get("count")? {
        Bson::Int32(n) => *n as i64,
        Bson::Int64(n) => *n,
        _ => return None,
    };
    Some((rating, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::program::RatingSnapshot;

    #[test]
    fn test_histogram_entries_feed_snapshot() {
        let groups = vec![
            doc! { "_id": 5, "count": 2 },
            doc! { "_id": 4, "count": 1_i64 },
            doc! { "_id": 3, "count": 1 },
            doc! { "_id": Bson::Null, "count": 7 },
        ];
        let histogram: Vec<(i32, i64)> = groups.iter().filter_map(histogram_entry).collect();
        assert_eq!(histogram.len(), 3);

        let snapshot = RatingSnapshot::from_histogram(&histogram);
        assert_eq!(snapshot.average, 4.3);
        assert_eq!(snapshot.distribution.rating5, 2);
    }
}
