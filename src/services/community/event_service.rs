//! Community events: organizer-owned CRUD and attendee registration.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::events::{CreateEventRequest, EventFilter, EventResponse, UpdateEventRequest};
use crate::domain::entities::event::{Event, EventStatus};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::community::event_repo::EventRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::datetime::from_chrono;
use crate::utils::string_utils::{clean_optional_string, normalize_tags, validate_required_string};

#[service(name = "event")]
pub struct EventService {
    event_repo: Arc<EventRepository>,
    user_repo: Arc<UserRepository>,
}

impl EventService {
    async fn find_event(&self, id: ObjectId) -> Result<Event, AppError> {
        self.event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("الفعالية غير موجودة".to_string()))
    }

    async fn respond(&self, event: Event) -> Result<EventResponse, AppError> {
        let users = self.user_repo.summaries(&[event.organizer]).await?;
        Ok(EventResponse::new(event, &users))
    }

    pub async fn list(&self, filter: EventFilter, query: &PageQuery, include_unpublished: bool) -> Result<Page<EventResponse>, AppError> {
        let mongo_filter = event_filter_document(&filter, DateTime::now(), include_unpublished);
        let page = self.event_repo.find_page(mongo_filter, query).await?;

        let organizers: Vec<ObjectId> = page.items.iter().map(|e| e.organizer).collect();
        let users = self.user_repo.summaries(&organizers).await?;

        Ok(page.map(|event| EventResponse::new(event, &users)))
    }

    /// Unpublished events are visible to their organizer and admins only
    pub async fn get(&self, viewer: Option<&AuthenticatedUser>, id: ObjectId) -> Result<EventResponse, AppError> {
        let event = self.find_event(id).await?;
        if !event.is_published && !viewer.is_some_and(|v| v.can_manage(&event.organizer)) {
            return Err(AppError::NotFound("الفعالية غير موجودة".to_string()));
        }
        self.respond(event).await
    }

    pub async fn create(&self, actor: &AuthenticatedUser, request: CreateEventRequest) -> Result<EventResponse, AppError> {
        let now = DateTime::now();
        let is_online = request.is_online.unwrap_or(false);
        let meeting_url = clean_optional_string(request.meeting_url);
        if is_online && meeting_url.is_none() {
            return Err(AppError::ValidationError("رابط الاجتماع مطلوب للفعاليات الإلكترونية".to_string()));
        }

        let event = Event {
            id: None,
            title: validate_required_string(&request.title, "العنوان")?,
            description: request.description.trim().to_string(),
            category: request.category.trim().to_string(),
            location: request.location.map(|l| l.trim().to_string()).unwrap_or_default(),
            is_online,
            meeting_url,
            start_date: from_chrono(request.start_date),
            end_date: from_chrono(request.end_date),
            organizer: actor.user_id,
            capacity: request.capacity,
            attendees: Vec::new(),
            status: EventStatus::Upcoming,
            is_published: request.is_published.unwrap_or(true),
            tags: normalize_tags(request.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        let created = self.event_repo.create(event).await?;
        log::info!("event '{}' created by {}", created.title, actor.user_id.to_hex());
        self.respond(created).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, id: ObjectId, request: UpdateEventRequest) -> Result<EventResponse, AppError> {
        let event = self.find_event(id).await?;
        actor.ensure_can_manage(&event.organizer)?;

        let start = request.start_date.map(from_chrono).unwrap_or(event.start_date);
        let end = request.end_date.map(from_chrono).unwrap_or(event.end_date);
        if end < start {
            return Err(AppError::ValidationError("تاريخ الانتهاء يجب أن يكون بعد تاريخ البدء".to_string()));
        }

        let fields = event_update_document(request)?;
        if fields.is_empty() {
            return self.respond(event).await;
        }

        let updated = self
            .event_repo
            .update_fields(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("الفعالية غير موجودة".to_string()))?;
        self.respond(updated).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: ObjectId) -> Result<(), AppError> {
        let event = self.find_event(id).await?;
        actor.ensure_can_manage(&event.organizer)?;

        self.event_repo.delete(id).await?;
        log::info!("event {} deleted by {}", id.to_hex(), actor.user_id.to_hex());
        Ok(())
    }

    pub async fn register(&self, user: ObjectId, id: ObjectId) -> Result<EventResponse, AppError> {
        let event = self.find_event(id).await?;
        event.check_registration(&user)?;

        if !self.event_repo.add_attendee(id, user).await? {
            let current = self.find_event(id).await?;
            current.check_registration(&user)?;
            return Err(AppError::ValidationError("الفعالية غير متاحة للتسجيل".to_string()));
        }

        self.respond(self.find_event(id).await?).await
    }

    pub async fn unregister(&self, user: ObjectId, id: ObjectId) -> Result<EventResponse, AppError> {
        self.find_event(id).await?;

        if !self.event_repo.remove_attendee(id, user).await? {
            return Err(AppError::ValidationError("أنت غير مسجل في هذه الفعالية".to_string()));
        }

        self.respond(self.find_event(id).await?).await
    }
}

fn event_filter_document(filter: &EventFilter, now: DateTime, include_unpublished: bool) -> Document {
    let mut mongo_filter = Document::new();

    if !include_unpublished {
        mongo_filter.insert("is_published", true);
    }
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        mongo_filter.insert("category", category);
    }
    if let Some(status) = filter.status {
        mongo_filter.insert("status", status.as_str());
    }
    if filter.upcoming == Some(true) {
        mongo_filter.insert("start_date", doc! { "$gte": now });
    }

    mongo_filter
}

fn event_update_document(request: UpdateEventRequest) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(title) = request.title {
        fields.insert("title", validate_required_string(&title, "العنوان")?);
    }
    if let Some(description) = request.description {
        fields.insert("description", description.trim());
    }
    if let Some(category) = request.category {
        fields.insert("category", category.trim());
    }
    if let Some(location) = request.location {
        fields.insert("location", location.trim());
    }
    if let Some(is_online) = request.is_online {
        fields.insert("is_online", is_online);
    }
    if let Some(meeting_url) = clean_optional_string(request.meeting_url) {
        fields.insert("meeting_url", meeting_url);
    }
    if let Some(start_date) = request.start_date {
        fields.insert("start_date", from_chrono(start_date));
    }
    if let Some(end_date) = request.end_date {
        fields.insert("end_date", from_chrono(end_date));
    }
    if let Some(capacity) = request.capacity {
        fields.insert("capacity", capacity as i64);
    }
    if let Some(status) = request.status {
        fields.insert("status", status.as_str());
    }
    if let Some(is_published) = request.is_published {
        fields.insert("is_published", is_published);
    }
    if let Some(tags) = request.tags {
        fields.insert("tags", normalize_tags(tags));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upcoming_filter() {
        let now = DateTime::now();
        let filter = event_filter_document(
            &EventFilter { upcoming: Some(true), status: Some(EventStatus::Upcoming), ..Default::default() },
            now,
            false,
        );
        assert_eq!(*filter.get_document("start_date").unwrap().get_datetime("$gte").unwrap(), now);
        assert_eq!(filter.get_bool("is_published").unwrap(), true);
        assert_eq!(filter.get_str("status").unwrap(), "upcoming");
    }

    #[test]
    fn test_cancel_via_update() {
        let fields = event_update_document(UpdateEventRequest {
            status: Some(EventStatus::Cancelled),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.get_str("status").unwrap(), "cancelled");
        assert_eq!(fields.len(), 1);
    }
}
