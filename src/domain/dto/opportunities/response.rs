use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::opportunity::{Opportunity, OpportunityKind, OpportunityStatus};
use crate::utils::datetime::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub category: String,
    pub location: String,
    pub is_remote: bool,
    pub deadline: DateTime<Utc>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub max_applicants: Option<u32>,
    pub current_applicants: i64,
    pub status: OpportunityStatus,
    pub is_urgent: bool,
    pub posted_by: UserRef,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpportunityResponse {
    pub fn new(opportunity: Opportunity, users: &UserSummaries) -> Self {
        Self {
            id: opportunity.id.map(|id| id.to_hex()).unwrap_or_default(),
            posted_by: UserRef::resolve(&opportunity.posted_by, users),
            title: opportunity.title,
            description: opportunity.description,
            organization: opportunity.organization,
            kind: opportunity.kind,
            category: opportunity.category,
            location: opportunity.location,
            is_remote: opportunity.is_remote,
            deadline: to_chrono(opportunity.deadline),
            requirements: opportunity.requirements,
            benefits: opportunity.benefits,
            max_applicants: opportunity.max_applicants,
            current_applicants: opportunity.current_applicants,
            status: opportunity.status,
            is_urgent: opportunity.is_urgent,
            tags: opportunity.tags,
            created_at: to_chrono(opportunity.created_at),
            updated_at: to_chrono(opportunity.updated_at),
        }
    }
}

impl From<Opportunity> for OpportunityResponse {
    fn from(opportunity: Opportunity) -> Self {
        Self::new(opportunity, &UserSummaries::new())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCard {
    pub id: String,
    pub title: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub category: String,
    pub deadline: DateTime<Utc>,
    pub is_urgent: bool,
}

impl From<&Opportunity> for OpportunityCard {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            id: opportunity.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: opportunity.title.clone(),
            organization: opportunity.organization.clone(),
            kind: opportunity.kind,
            category: opportunity.category.clone(),
            deadline: to_chrono(opportunity.deadline),
            is_urgent: opportunity.is_urgent,
        }
    }
}
