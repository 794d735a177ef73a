use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::utils::datetime::MILLIS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    Job,
    Internship,
    Scholarship,
    Competition,
    Volunteer,
    Training,
}

impl OpportunityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityKind::Job => "job",
            OpportunityKind::Internship => "internship",
            OpportunityKind::Scholarship => "scholarship",
            OpportunityKind::Competition => "competition",
            OpportunityKind::Volunteer => "volunteer",
            OpportunityKind::Training => "training",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Draft,
    #[default]
    Active,
    Closed,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Draft => "draft",
            OpportunityStatus::Active => "active",
            OpportunityStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub user: ObjectId,
    pub applied_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub organization: String,
    pub kind: OpportunityKind,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    pub deadline: DateTime,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_applicants: Option<u32>,
    #[serde(default)]
    pub applicants: Vec<Applicant>,
    #[serde(default)]
    pub current_applicants: i64,
    #[serde(default)]
    pub status: OpportunityStatus,
    #[serde(default)]
    pub is_urgent: bool,
    pub posted_by: ObjectId,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Opportunity {
    /// Marks the opportunity urgent when its deadline falls inside the
    /// window (and has not passed yet). Runs before every save.
    pub fn refresh_urgency(&mut self, now: DateTime, window_days: i64) {
        self.is_urgent = is_urgent_deadline(self.deadline, now, window_days);
    }

    pub fn deadline_passed(&self, now: DateTime) -> bool {
        self.deadline.timestamp_millis() < now.timestamp_millis()
    }

    pub fn is_full(&self) -> bool {
        self.max_applicants
            .is_some_and(|max| self.current_applicants >= max as i64)
    }

    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.posted_by == *user
    }

    /// Preconditions for a new application; uniqueness is left to the index
    pub fn check_application(&self, now: DateTime) -> Result<(), AppError> {
        if self.status != OpportunityStatus::Active {
            return Err(AppError::ValidationError("هذه الفرصة غير متاحة للتقديم".to_string()));
        }
        if self.deadline_passed(now) {
            return Err(AppError::ValidationError("انتهى موعد التقديم".to_string()));
        }
        if self.is_full() {
            return Err(AppError::ValidationError("تم الوصول إلى الحد الأقصى للمتقدمين".to_string()));
        }
        Ok(())
    }
}

pub fn is_urgent_deadline(deadline: DateTime, now: DateTime, window_days: i64) -> bool {
    let remaining = deadline.timestamp_millis() - now.timestamp_millis();
    remaining >= 0 && remaining <= window_days * MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::add_days;

    fn opportunity(deadline: DateTime) -> Opportunity {
        let now = DateTime::now();
        Opportunity {
            id: Some(ObjectId::new()),
            title: "تدريب صيفي".into(),
            description: "وصف".into(),
            organization: "منظمة".into(),
            kind: OpportunityKind::Internship,
            category: "technology".into(),
            location: String::new(),
            is_remote: true,
            deadline,
            requirements: Vec::new(),
            benefits: Vec::new(),
            max_applicants: Some(2),
            applicants: Vec::new(),
            current_applicants: 0,
            status: OpportunityStatus::Active,
            is_urgent: false,
            posted_by: ObjectId::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_refresh_urgency_window() {
        let now = DateTime::now();

        let mut soon = opportunity(add_days(now, 3));
        soon.refresh_urgency(now, 7);
        assert!(soon.is_urgent);

        let mut later = opportunity(add_days(now, 30));
        later.is_urgent = true;
        later.refresh_urgency(now, 7);
        assert!(!later.is_urgent);

        let mut past = opportunity(add_days(now, -1));
        past.refresh_urgency(now, 7);
        assert!(!past.is_urgent);
    }

    #[test]
    fn test_check_application() {
        let now = DateTime::now();
        let mut opp = opportunity(add_days(now, 10));
        assert!(opp.check_application(now).is_ok());

        opp.current_applicants = 2;
        assert!(opp.check_application(now).is_err());

        let expired = opportunity(add_days(now, -2));
        assert!(expired.check_application(now).is_err());

        let mut closed = opportunity(add_days(now, 10));
        closed.status = OpportunityStatus::Closed;
        assert!(closed.check_application(now).is_err());
    }
}
