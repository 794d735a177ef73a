use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::event::EventStatus;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_event"))]
pub struct CreateEventRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: String,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: String,

    pub location: Option<String>,
    pub is_online: Option<bool>,

    #[validate(url(message = "رابط الاجتماع غير صالح"))]
    pub meeting_url: Option<String>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(range(min = 1, message = "السعة يجب أن تكون 1 على الأقل"))]
    pub capacity: Option<u32>,

    pub is_published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: Option<String>,

    pub location: Option<String>,
    pub is_online: Option<bool>,

    #[validate(url(message = "رابط الاجتماع غير صالح"))]
    pub meeting_url: Option<String>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "السعة يجب أن تكون 1 على الأقل"))]
    pub capacity: Option<u32>,

    pub status: Option<EventStatus>,
    pub is_published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub status: Option<EventStatus>,
    pub upcoming: Option<bool>,
}

fn validate_create_event(req: &CreateEventRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        return Err(ValidationError::new("invalid_dates")
            .with_message("تاريخ الانتهاء يجب أن يكون بعد تاريخ البدء".into()));
    }
    Ok(())
}
