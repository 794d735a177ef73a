//! # Application repository
//!
//! Status changes are conditional updates on the current status, so two
//! concurrent requests cannot both act on the same state. This is what
//! keeps a double withdraw from decrementing the opportunity counter twice.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppError;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::entities::application::{Application, ApplicationStatus, StatusChange};
use crate::repositories::find_page;

#[repository(name = "application", collection = "applications")]
pub struct ApplicationRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ApplicationRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Application>, AppError> {
        Ok(self.collection::<Application>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    /// Duplicate `(applicant, opportunity)` surfaces as `DuplicateError`
    pub async fn create(&self, mut application: Application) -> Result<Application, AppError> {
        let result = self.collection::<Application>()
            .insert_one(&application)
            .await?;

        application.id = result.inserted_id.as_object_id();
        Ok(application)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        self.collection::<Application>()
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(())
    }

    pub async fn delete_by_opportunity(&self, opportunity: ObjectId) -> Result<u64, AppError> {
        let result = self.collection::<Application>()
            .delete_many(doc! { "opportunity": opportunity })
            .await?;
        Ok(result.deleted_count)
    }

    /// Moves `id` from `from` to `to`. `None` when the stored status was no
    /// longer `from`.
    pub async fn transition(
        &self,
        id: ObjectId,
        from: ApplicationStatus,
        to: ApplicationStatus,
        changed_by: ObjectId,
        notes: Option<String>,
        reviewed: bool,
    ) -> Result<Option<Application>, AppError> {
        let (filter, update) =
            transition_documents(id, from, to, changed_by, notes, reviewed, DateTime::now())?;

        Ok(self.collection::<Application>()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Application>, AppError> {
        let sort = query.sort_document(&["created_at", "updated_at", "status"], doc! { "created_at": -1 });
        find_page(&self.collection::<Application>(), filter, sort, query).await
    }

    /// status → count for one applicant
    pub async fn count_by_status(&self, applicant: ObjectId) -> Result<BTreeMap<String, u64>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "applicant": applicant } },
            doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } },
        ];

        let groups: Vec<Document> = self.collection::<Application>()
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        let mut counts: BTreeMap<String, u64> = ApplicationStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for group in groups {
            let (Ok(status), Ok(count)) = (group.get_str("_id"), group.get_i32("count")) else {
                continue;
            };
            counts.insert(status.to_string(), count.max(0) as u64);
        }
        Ok(counts)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Application>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "applicant": 1, "opportunity": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("applicant_opportunity_unique".to_string())
                .build())
            .build();

        let opportunity_index = IndexModel::builder()
            .keys(doc! { "opportunity": 1, "status": 1 })
            .options(IndexOptions::builder()
                .name("opportunity_status".to_string())
                .build())
            .build();

        self.collection::<Application>()
            .create_indexes([pair_index, opportunity_index])
            .await?;

        Ok(())
    }
}

/// Filter and update for a status change. The filter pins the current
/// status, so a second request acting on the same state matches nothing.
fn transition_documents(
    id: ObjectId,
    from: ApplicationStatus,
    to: ApplicationStatus,
    changed_by: ObjectId,
    notes: Option<String>,
    reviewed: bool,
    now: DateTime,
) -> Result<(Document, Document), AppError> {
    let change = StatusChange { status: to, changed_at: now, changed_by };

    let mut set = doc! { "status": to.as_str(), "updated_at": now };
    if reviewed {
        set.insert("reviewed_by", changed_by);
        set.insert("reviewed_at", now);
    }
    if let Some(notes) = notes {
        set.insert("notes", notes);
    }

    let filter = doc! { "_id": id, "status": from.as_str() };
    let update = doc! { "$set": set, "$push": { "status_history": to_bson(&change)? } };
    Ok((filter, update))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw_only_matches_pending_application() {
        let id = ObjectId::new();
        let applicant = ObjectId::new();

        let (filter, update) = transition_documents(
            id,
            ApplicationStatus::Pending,
            ApplicationStatus::Withdrawn,
            applicant,
            None,
            false,
            DateTime::now(),
        )
        .unwrap();

        assert_eq!(filter, doc! { "_id": id, "status": "pending" });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "withdrawn");
        assert!(!set.contains_key("reviewed_by"));
        assert!(!set.contains_key("notes"));

        let pushed = update
            .get_document("$push")
            .and_then(|push| push.get_document("status_history"))
            .unwrap();
        assert_eq!(pushed.get_str("status").unwrap(), "withdrawn");
        assert_eq!(pushed.get_object_id("changed_by").unwrap(), applicant);
    }

    #[test]
    fn test_review_records_reviewer_and_notes() {
        let reviewer = ObjectId::new();
        let now = DateTime::now();

        let (filter, update) = transition_documents(
            ObjectId::new(),
            ApplicationStatus::Reviewing,
            ApplicationStatus::Accepted,
            reviewer,
            Some("strong portfolio".to_string()),
            true,
            now,
        )
        .unwrap();

        assert_eq!(filter.get_str("status").unwrap(), "reviewing");

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_object_id("reviewed_by").unwrap(), reviewer);
        assert_eq!(set.get_datetime("reviewed_at").unwrap(), &now);
        assert_eq!(set.get_str("notes").unwrap(), "strong portfolio");
    }
}
