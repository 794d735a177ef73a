//! # Opportunity repository
//!
//! Applicant bookkeeping uses conditional updates so the counter cannot
//! overshoot or go negative:
//!
//! | Operation | Filter guard | Update |
//! |-----------|--------------|--------|
//! | `add_applicant` | active, below `max_applicants` | `$push` applicant, `$inc` +1 |
//! | `remove_applicant` | `current_applicants > 0` | `$pull` applicant, `$inc` -1 |
//!
//! Duplicate applications are stopped earlier by the unique
//! `(applicant, opportunity)` index on `applications`.
//!
//! ```rust,ignore
//! let opportunities = OpportunityRepository::instance();
//! if !opportunities.add_applicant(opportunity_id, user_id).await? {
//!     return Err(AppError::ValidationError("...".to_string()));
//! }
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
use crate::domain::entities::opportunity::Opportunity;
use crate::repositories::{find_all, find_page, ids_filter, with_search};

#[repository(name = "opportunity", collection = "opportunities")]
pub struct OpportunityRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl OpportunityRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Opportunity>, AppError> {
        Ok(self.collection::<Opportunity>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Opportunity>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        find_all(&self.collection::<Opportunity>(), ids_filter(ids), doc! {}, 0).await
    }

    pub async fn create(&self, mut opportunity: Opportunity) -> Result<Opportunity, AppError> {
        let result = self.collection::<Opportunity>()
            .insert_one(&opportunity)
            .await?;

        opportunity.id = result.inserted_id.as_object_id();
        Ok(opportunity)
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Opportunity>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Opportunity>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Opportunity>()
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Records an applicant while the opportunity is active and below
    /// `max_applicants`; `false` when the guard failed
    pub async fn add_applicant(&self, id: ObjectId, user: ObjectId) -> Result<bool, AppError> {
        let now = DateTime::now();
        let filter = doc! {
            "_id": id,
            "status": "active",
            "$or": [
                { "max_applicants": null },
                { "$expr": { "$lt": ["$current_applicants", "$max_applicants"] } },
            ],
        };
        let update = doc! {
            "$push": { "applicants": { "user": user, "applied_at": now } },
            "$inc": { "current_applicants": 1 },
            "$set": { "updated_at": now },
        };

        let result = self.collection::<Opportunity>()
            .update_one(filter, update)
            .await?;
        Ok(result.modified_count > 0)
    }

    /// Removes the applicant; the counter never drops below zero
    pub async fn remove_applicant(&self, id: ObjectId, user: ObjectId) -> Result<(), AppError> {
        let collection = self.collection::<Opportunity>();

        collection
            .update_one(doc! { "_id": id }, doc! { "$pull": { "applicants": { "user": user } } })
            .await?;
        collection
            .update_one(
                doc! { "_id": id, "current_applicants": { "$gt": 0 } },
                doc! { "$inc": { "current_applicants": -1 } },
            )
            .await?;
        Ok(())
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Opportunity>, AppError> {
        let filter = with_search(filter, &["title", "description", "organization"], query);
        let sort = query.sort_document(
            &["title", "deadline", "created_at", "current_applicants"],
            doc! { "is_urgent": -1, "deadline": 1 },
        );
        find_page(&self.collection::<Opportunity>(), filter, sort, query).await
    }

    /// Active, still open opportunities in `categories`, skipping `exclude`
    pub async fn find_recommended(
        &self,
        categories: &[String],
        exclude: &[ObjectId],
        limit: i64,
    ) -> Result<Vec<Opportunity>, AppError> {
        let filter = doc! {
            "category": { "$in": categories.to_vec() },
            "status": "active",
            "deadline": { "$gte": DateTime::now() },
            "_id": { "$nin": exclude.to_vec() },
        };
        find_all(&self.collection::<Opportunity>(), filter, doc! { "deadline": 1 }, limit).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Opportunity>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let status_deadline_index = IndexModel::builder()
            .keys(doc! { "status": 1, "deadline": 1 })
            .options(IndexOptions::builder()
                .name("status_deadline".to_string())
                .build())
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "kind": 1 })
            .options(IndexOptions::builder()
                .name("category_kind".to_string())
                .build())
            .build();

        let posted_by_index = IndexModel::builder()
            .keys(doc! { "posted_by": 1 })
            .options(IndexOptions::builder()
                .name("posted_by".to_string())
                .build())
            .build();

        self.collection::<Opportunity>()
            .create_indexes([status_deadline_index, category_index, posted_by_index])
            .await?;

        Ok(())
    }
}
