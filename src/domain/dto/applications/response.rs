use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::dto::opportunities::OpportunityCard;
use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::application::{Application, ApplicationAnswer, ApplicationStatus};
use crate::domain::entities::opportunity::Opportunity;
use crate::utils::datetime::{to_chrono, to_chrono_opt};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub status: ApplicationStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

/// Opportunity reference, populated when available
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OpportunityRef {
    Populated(OpportunityCard),
    Id(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub applicant: UserRef,
    pub opportunity: OpportunityRef,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub resume_url: Option<String>,
    pub answers: Vec<ApplicationAnswer>,
    pub notes: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub status_history: Vec<StatusChangeResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationResponse {
    pub fn new(
        application: Application,
        users: &UserSummaries,
        opportunities: &HashMap<ObjectId, Opportunity>,
    ) -> Self {
        let opportunity = match opportunities.get(&application.opportunity) {
            Some(opp) => OpportunityRef::Populated(OpportunityCard::from(opp)),
            None => OpportunityRef::Id(application.opportunity.to_hex()),
        };

        Self {
            id: application.id.map(|id| id.to_hex()).unwrap_or_default(),
            applicant: UserRef::resolve(&application.applicant, users),
            opportunity,
            status: application.status,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            answers: application.answers,
            notes: application.notes,
            reviewed_by: application.reviewed_by.map(|id| id.to_hex()),
            reviewed_at: to_chrono_opt(application.reviewed_at),
            status_history: application
                .status_history
                .into_iter()
                .map(|change| StatusChangeResponse {
                    status: change.status,
                    changed_at: to_chrono(change.changed_at),
                    changed_by: change.changed_by.to_hex(),
                })
                .collect(),
            created_at: to_chrono(application.created_at),
            updated_at: to_chrono(application.updated_at),
        }
    }
}

impl From<Application> for ApplicationResponse {
    fn from(application: Application) -> Self {
        Self::new(application, &UserSummaries::new(), &HashMap::new())
    }
}
