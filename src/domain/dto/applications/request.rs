use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::application::{ApplicationAnswer, ApplicationStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    /// Taken from the path on `POST /opportunities/{id}/apply`
    pub opportunity_id: Option<String>,

    #[validate(length(max = 5000, message = "رسالة التقديم يجب ألا تتجاوز 5000 حرف"))]
    pub cover_letter: Option<String>,

    #[validate(url(message = "رابط السيرة الذاتية غير صالح"))]
    pub resume_url: Option<String>,

    pub answers: Option<Vec<ApplicationAnswer>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,

    #[validate(length(max = 2000, message = "الملاحظات يجب ألا تتجاوز 2000 حرف"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
}
