use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::achievement::RequirementType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequirementRequest {
    #[serde(rename = "type")]
    pub kind: RequirementType,

    #[validate(range(min = 0.0, message = "قيمة الشرط لا يمكن أن تكون سالبة"))]
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAchievementRequest {
    #[validate(length(min = 2, max = 100, message = "اسم الإنجاز يجب أن يكون بين 2 و 100 حرف"))]
    pub name: String,

    #[validate(length(min = 2, max = 500, message = "وصف الإنجاز مطلوب"))]
    pub description: String,

    pub icon: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: String,

    #[validate(range(min = 0, max = 10000, message = "النقاط غير صالحة"))]
    pub points: Option<i64>,

    #[validate(nested)]
    pub requirements: RequirementRequest,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAchievementRequest {
    #[validate(length(min = 2, max = 100, message = "اسم الإنجاز يجب أن يكون بين 2 و 100 حرف"))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 500, message = "وصف الإنجاز مطلوب"))]
    pub description: Option<String>,

    pub icon: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: Option<String>,

    #[validate(range(min = 0, max = 10000, message = "النقاط غير صالحة"))]
    pub points: Option<i64>,

    #[validate(nested)]
    pub requirements: Option<RequirementRequest>,

    pub is_active: Option<bool>,
}
