//! Event documents and attendee registration.

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
use crate::domain::entities::event::Event;
use crate::repositories::{find_page, with_search};

#[repository(name = "event", collection = "events")]
pub struct EventRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl EventRepository {
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Event>, AppError> {
        Ok(self.collection::<Event>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    pub async fn create(&self, mut event: Event) -> Result<Event, AppError> {
        let result = self.collection::<Event>()
            .insert_one(&event)
            .await?;

        event.id = result.inserted_id.as_object_id();
        Ok(event)
    }

    pub async fn update_fields(&self, id: ObjectId, mut fields: Document) -> Result<Option<Event>, AppError> {
        fields.insert("updated_at", DateTime::now());

        Ok(self.collection::<Event>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Event>()
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Registers `user` while the event is open and has room
    pub async fn add_attendee(&self, id: ObjectId, user: ObjectId) -> Result<bool, AppError> {
        let filter = doc! {
            "_id": id,
            "is_published": true,
            "status": { "$nin": ["cancelled", "completed"] },
            "attendees": { "$ne": user },
            "$or": [
                { "capacity": null },
                { "$expr": { "$lt": [{ "$size": "$attendees" }, "$capacity"] } },
            ],
        };

        let result = self.collection::<Event>()
            .update_one(filter, doc! { "$addToSet": { "attendees": user } })
            .await?;
        Ok(result.modified_count > 0)
    }

    pub async fn remove_attendee(&self, id: ObjectId, user: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Event>()
            .update_one(doc! { "_id": id }, doc! { "$pull": { "attendees": user } })
            .await?;
        Ok(result.modified_count > 0)
    }

    pub async fn find_page(&self, filter: Document, query: &PageQuery) -> Result<Page<Event>, AppError> {
        let filter = with_search(filter, &["title", "description", "location"], query);
        let sort = query.sort_document(&["title", "start_date", "created_at"], doc! { "start_date": 1 });
        find_page(&self.collection::<Event>(), filter, sort, query).await
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Event>().count_documents(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let start_index = IndexModel::builder()
            .keys(doc! { "is_published": 1, "start_date": 1 })
            .options(IndexOptions::builder()
                .name("published_start".to_string())
                .build())
            .build();

        let organizer_index = IndexModel::builder()
            .keys(doc! { "organizer": 1 })
            .options(IndexOptions::builder()
                .name("organizer".to_string())
                .build())
            .build();

        self.collection::<Event>()
            .create_indexes([start_index, organizer_index])
            .await?;

        Ok(())
    }
}
