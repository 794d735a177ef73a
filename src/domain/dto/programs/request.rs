use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::program::{CurriculumItem, ProgramLevel};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateProgramRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: String,

    #[validate(length(max = 300, message = "الوصف المختصر يجب ألا يتجاوز 300 حرف"))]
    pub short_description: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: String,

    pub level: Option<ProgramLevel>,

    #[validate(range(max = 10000, message = "عدد الساعات غير صالح"))]
    pub duration_hours: Option<u32>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "الحد الأقصى للمشاركين يجب أن يكون 1 على الأقل"))]
    pub max_participants: Option<u32>,

    pub curriculum: Option<Vec<CurriculumItem>>,
    pub tags: Option<Vec<String>>,

    #[validate(range(min = 0.0, message = "السعر لا يمكن أن يكون سالباً"))]
    pub price: Option<f64>,

    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProgramRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: Option<String>,

    #[validate(length(max = 300, message = "الوصف المختصر يجب ألا يتجاوز 300 حرف"))]
    pub short_description: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: Option<String>,

    pub level: Option<ProgramLevel>,
    pub duration_hours: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1, message = "الحد الأقصى للمشاركين يجب أن يكون 1 على الأقل"))]
    pub max_participants: Option<u32>,

    pub curriculum: Option<Vec<CurriculumItem>>,
    pub tags: Option<Vec<String>>,

    #[validate(range(min = 0.0, message = "السعر لا يمكن أن يكون سالباً"))]
    pub price: Option<f64>,

    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFilter {
    pub category: Option<String>,
    pub level: Option<ProgramLevel>,
    pub featured: Option<bool>,
    pub instructor: Option<String>,
}

fn check_dates(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::new("invalid_dates")
                .with_message("تاريخ الانتهاء يجب أن يكون بعد تاريخ البدء".into()));
        }
    }
    Ok(())
}

fn validate_create_dates(req: &CreateProgramRequest) -> Result<(), ValidationError> {
    check_dates(req.start_date, req.end_date)
}

fn validate_update_dates(req: &UpdateProgramRequest) -> Result<(), ValidationError> {
    check_dates(req.start_date, req.end_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_program_from_json() {
        let json = r#"{
            "title": "أساسيات البرمجة",
            "description": "مقدمة شاملة للبرمجة للمبتدئين",
            "category": "technology",
            "level": "beginner",
            "maxParticipants": 30,
            "startDate": "2026-01-10T09:00:00Z",
            "endDate": "2026-02-10T09:00:00Z"
        }"#;
        let req: CreateProgramRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.max_participants, Some(30));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let json = r#"{
            "title": "برنامج",
            "description": "وصف طويل بما يكفي",
            "category": "technology",
            "startDate": "2026-03-10T09:00:00Z",
            "endDate": "2026-02-10T09:00:00Z"
        }"#;
        let req: CreateProgramRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }
}
