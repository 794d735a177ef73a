use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::user_progress::ProgressAction;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub program_id: String,

    pub action: ProgressAction,

    #[validate(length(min = 1, max = 100, message = "معرف الدرس غير صالح"))]
    pub lesson_id: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "نسبة الإنجاز يجب أن تكون بين 0 و 100"))]
    pub completion_percentage: Option<f64>,

    /// Minutes spent since the previous report
    #[serde(alias = "timeSpent")]
    #[validate(range(min = 0.0, max = 1440.0, message = "الوقت المستغرق غير صالح"))]
    pub time_spent_minutes: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        let json = r#"{ "programId": "507f1f77bcf86cd799439011", "action": "lesson_completed", "lessonId": "l-1", "timeSpent": 30 }"#;
        let req: UpdateProgressRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.action, ProgressAction::LessonCompleted);
        assert_eq!(req.time_spent_minutes, Some(30.0));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_percentage_out_of_range() {
        let json = r#"{ "programId": "507f1f77bcf86cd799439011", "action": "progress_update", "completionPercentage": 120 }"#;
        let req: UpdateProgressRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }
}
