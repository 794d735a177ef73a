use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::opportunity::{OpportunityKind, OpportunityStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: String,

    #[validate(length(min = 2, max = 100, message = "اسم الجهة مطلوب"))]
    pub organization: String,

    #[serde(rename = "type", alias = "kind")]
    pub kind: OpportunityKind,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: String,

    #[validate(length(max = 100, message = "الموقع يجب ألا يتجاوز 100 حرف"))]
    pub location: Option<String>,

    pub is_remote: Option<bool>,
    pub deadline: DateTime<Utc>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,

    #[validate(range(min = 1, message = "الحد الأقصى للمتقدمين يجب أن يكون 1 على الأقل"))]
    pub max_applicants: Option<u32>,

    pub status: Option<OpportunityStatus>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpportunityRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "الوصف يجب أن يكون بين 10 و 5000 حرف"))]
    pub description: Option<String>,

    #[validate(length(min = 2, max = 100, message = "اسم الجهة مطلوب"))]
    pub organization: Option<String>,

    #[serde(rename = "type", alias = "kind")]
    pub kind: Option<OpportunityKind>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: Option<String>,

    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,

    #[validate(range(min = 1, message = "الحد الأقصى للمتقدمين يجب أن يكون 1 على الأقل"))]
    pub max_applicants: Option<u32>,

    pub status: Option<OpportunityStatus>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFilter {
    #[serde(rename = "type", alias = "kind")]
    pub kind: Option<OpportunityKind>,
    pub category: Option<String>,
    pub is_remote: Option<bool>,
    pub urgent: Option<bool>,
    pub status: Option<OpportunityStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_maps_to_kind() {
        let json = r#"{
            "title": "منحة دراسية",
            "description": "منحة كاملة لدراسة الماجستير",
            "organization": "مؤسسة التعليم",
            "type": "scholarship",
            "category": "education",
            "deadline": "2026-12-01T00:00:00Z"
        }"#;
        let req: CreateOpportunityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, OpportunityKind::Scholarship);
        assert!(req.validate().is_ok());
    }
}
