use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::event::{Event, EventStatus};
use crate::utils::datetime::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub is_online: bool,
    pub meeting_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub organizer: UserRef,
    pub capacity: Option<u32>,
    pub attendees_count: usize,
    pub status: EventStatus,
    pub is_published: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn new(event: Event, users: &UserSummaries) -> Self {
        Self {
            id: event.id.map(|id| id.to_hex()).unwrap_or_default(),
            organizer: UserRef::resolve(&event.organizer, users),
            attendees_count: event.attendees.len(),
            title: event.title,
            description: event.description,
            category: event.category,
            location: event.location,
            is_online: event.is_online,
            meeting_url: event.meeting_url,
            start_date: to_chrono(event.start_date),
            end_date: to_chrono(event.end_date),
            capacity: event.capacity,
            status: event.status,
            is_published: event.is_published,
            tags: event.tags,
            created_at: to_chrono(event.created_at),
            updated_at: to_chrono(event.updated_at),
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self::new(event, &UserSummaries::new())
    }
}
