use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Shortlisted,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Review workflow available to the opportunity poster. Withdrawal is a
    /// separate applicant-only path.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Reviewing)
                | (Pending, Rejected)
                | (Reviewing, Shortlisted)
                | (Reviewing, Accepted)
                | (Reviewing, Rejected)
                | (Shortlisted, Accepted)
                | (Shortlisted, Rejected)
        )
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub changed_at: DateTime,
    pub changed_by: ObjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub applicant: ObjectId,
    pub opportunity: ObjectId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub answers: Vec<ApplicationAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Application {
    pub fn new(
        applicant: ObjectId,
        opportunity: ObjectId,
        cover_letter: String,
        resume_url: Option<String>,
        answers: Vec<ApplicationAnswer>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            applicant,
            opportunity,
            status: ApplicationStatus::Pending,
            cover_letter,
            resume_url,
            answers,
            notes: None,
            reviewed_by: None,
            reviewed_at: None,
            status_history: vec![StatusChange {
                status: ApplicationStatus::Pending,
                changed_at: now,
                changed_by: applicant,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn check_transition(&self, next: ApplicationStatus) -> Result<(), AppError> {
        if self.status.is_final() {
            return Err(AppError::ValidationError(format!(
                "الطلب في حالة نهائية ({}) ولا يمكن تغييرها",
                self.status.as_str()
            )));
        }
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "لا يمكن تغيير حالة الطلب من {} إلى {}",
                self.status.as_str(),
                next.as_str()
            )))
        }
    }

    /// Only a pending application can be withdrawn
    pub fn check_withdraw(&self) -> Result<(), AppError> {
        if self.status == ApplicationStatus::Pending {
            Ok(())
        } else {
            Err(withdraw_rejected())
        }
    }
}

pub fn withdraw_rejected() -> AppError {
    AppError::ValidationError("لا يمكن سحب الطلب إلا إذا كان قيد الانتظار".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use ApplicationStatus::*;

        assert!(Pending.can_transition_to(Reviewing));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Reviewing.can_transition_to(Accepted));
        assert!(Shortlisted.can_transition_to(Accepted));

        assert!(!Pending.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Withdrawn.can_transition_to(Reviewing));
        for status in ApplicationStatus::ALL {
            assert!(!status.can_transition_to(Withdrawn));
        }
    }

    #[test]
    fn test_withdraw_only_from_pending() {
        let mut app = Application::new(ObjectId::new(), ObjectId::new(), "رسالة".into(), None, vec![]);
        assert!(app.check_withdraw().is_ok());

        app.status = ApplicationStatus::Reviewing;
        assert!(app.check_withdraw().is_err());

        app.status = ApplicationStatus::Withdrawn;
        assert!(app.check_withdraw().is_err());
    }

    #[test]
    fn test_final_status_rejects_any_transition() {
        let mut app = Application::new(ObjectId::new(), ObjectId::new(), "رسالة".into(), None, vec![]);
        app.status = ApplicationStatus::Accepted;
        assert!(matches!(
            app.check_transition(ApplicationStatus::Rejected),
            Err(AppError::ValidationError(_))
        ));

        app.status = ApplicationStatus::Reviewing;
        assert!(app.check_transition(ApplicationStatus::Shortlisted).is_ok());
    }

    #[test]
    fn test_new_application_records_history() {
        let applicant = ObjectId::new();
        let app = Application::new(applicant, ObjectId::new(), String::new(), None, vec![]);
        assert_eq!(app.status_history.len(), 1);
        assert_eq!(app.status_history[0].changed_by, applicant);
    }
}
