use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub organizer: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub attendees: Vec<ObjectId>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Event {
    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.organizer == *user
    }

    pub fn is_attending(&self, user: &ObjectId) -> bool {
        self.attendees.contains(user)
    }

    pub fn check_registration(&self, user: &ObjectId) -> Result<(), AppError> {
        if !self.is_published
            || matches!(self.status, EventStatus::Cancelled | EventStatus::Completed)
        {
            return Err(AppError::ValidationError("الفعالية غير متاحة للتسجيل".to_string()));
        }
        if self.is_attending(user) {
            return Err(AppError::ValidationError("أنت مسجل بالفعل في هذه الفعالية".to_string()));
        }
        if self.capacity.is_some_and(|cap| self.attendees.len() as u32 >= cap) {
            return Err(AppError::ValidationError("الفعالية مكتملة".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        let now = DateTime::now();
        Event {
            id: Some(ObjectId::new()),
            title: "ملتقى الشباب".into(),
            description: "وصف".into(),
            category: "community".into(),
            location: "عمّان".into(),
            is_online: false,
            meeting_url: None,
            start_date: now,
            end_date: now,
            organizer: ObjectId::new(),
            capacity: Some(1),
            attendees: Vec::new(),
            status: EventStatus::Upcoming,
            is_published: true,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_registration_rules() {
        let user = ObjectId::new();
        let mut e = event();
        assert!(e.check_registration(&user).is_ok());

        e.attendees.push(user);
        assert!(e.check_registration(&user).is_err());
        assert!(e.check_registration(&ObjectId::new()).is_err());

        let mut cancelled = event();
        cancelled.status = EventStatus::Cancelled;
        assert!(cancelled.check_registration(&user).is_err());
    }
}
