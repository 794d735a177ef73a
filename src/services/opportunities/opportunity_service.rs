//! # Opportunity service
//!
//! Listings posted by organizations. The urgency flag is recomputed from the
//! deadline on every save and again when documents are read, so a listing
//! drifting into the urgent window is flagged without a background job.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::service;

use crate::config::OpportunityConfig;
use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::opportunities::{
    CreateOpportunityRequest, OpportunityFilter, OpportunityResponse, UpdateOpportunityRequest,
};
use crate::domain::entities::opportunity::{is_urgent_deadline, Opportunity, OpportunityStatus};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::opportunities::application_repo::ApplicationRepository;
use crate::repositories::opportunities::opportunity_repo::OpportunityRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::datetime::{add_days, from_chrono};
use crate::utils::string_utils::{normalize_tags, validate_required_string};

#[service(name = "opportunity")]
pub struct OpportunityService {
    opportunity_repo: Arc<OpportunityRepository>,
    application_repo: Arc<ApplicationRepository>,
    user_repo: Arc<UserRepository>,
}

impl OpportunityService {
    pub async fn find_opportunity(&self, id: ObjectId) -> Result<Opportunity, AppError> {
        let mut opportunity = self
            .opportunity_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("الفرصة غير موجودة".to_string()))?;

        opportunity.refresh_urgency(DateTime::now(), OpportunityConfig::urgent_window_days());
        Ok(opportunity)
    }

    pub async fn list(&self, filter: OpportunityFilter, query: &PageQuery) -> Result<Page<OpportunityResponse>, AppError> {
        let now = DateTime::now();
        let window = OpportunityConfig::urgent_window_days();

        let mongo_filter = opportunity_filter_document(&filter, now, window);
        let page = self.opportunity_repo.find_page(mongo_filter, query).await?;

        let posters: Vec<ObjectId> = page.items.iter().map(|o| o.posted_by).collect();
        let users = self.user_repo.summaries(&posters).await?;

        Ok(page.map(|mut opportunity| {
            opportunity.refresh_urgency(now, window);
            OpportunityResponse::new(opportunity, &users)
        }))
    }

    pub async fn get(&self, id: ObjectId) -> Result<OpportunityResponse, AppError> {
        let opportunity = self.find_opportunity(id).await?;
        let users = self.user_repo.summaries(&[opportunity.posted_by]).await?;
        Ok(OpportunityResponse::new(opportunity, &users))
    }

    pub async fn create(&self, actor: &AuthenticatedUser, request: CreateOpportunityRequest) -> Result<OpportunityResponse, AppError> {
        let now = DateTime::now();
        let deadline = from_chrono(request.deadline);
        if deadline.timestamp_millis() < now.timestamp_millis() {
            return Err(AppError::ValidationError("موعد التقديم يجب أن يكون في المستقبل".to_string()));
        }

        let mut opportunity = Opportunity {
            id: None,
            title: validate_required_string(&request.title, "العنوان")?,
            description: request.description.trim().to_string(),
            organization: request.organization.trim().to_string(),
            kind: request.kind,
            category: request.category.trim().to_string(),
            location: request.location.map(|l| l.trim().to_string()).unwrap_or_default(),
            is_remote: request.is_remote.unwrap_or(false),
            deadline,
            requirements: trimmed_list(request.requirements),
            benefits: trimmed_list(request.benefits),
            max_applicants: request.max_applicants,
            applicants: Vec::new(),
            current_applicants: 0,
            status: request.status.unwrap_or(OpportunityStatus::Active),
            is_urgent: false,
            posted_by: actor.user_id,
            tags: normalize_tags(request.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };
        opportunity.refresh_urgency(now, OpportunityConfig::urgent_window_days());

        let created = self.opportunity_repo.create(opportunity).await?;
        let id = created
            .id
            .ok_or_else(|| AppError::InternalError("opportunity has no id".to_string()))?;

        log::info!("opportunity {} posted by {}", id.to_hex(), actor.user_id.to_hex());
        self.get(id).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, id: ObjectId, request: UpdateOpportunityRequest) -> Result<OpportunityResponse, AppError> {
        let current = self.find_opportunity(id).await?;
        actor.ensure_can_manage(&current.posted_by)?;

        let now = DateTime::now();
        let mut fields = opportunity_update_document(request)?;

        let deadline = match fields.get_datetime("deadline") {
            Ok(deadline) => *deadline,
            Err(_) => current.deadline,
        };
        fields.insert(
            "is_urgent",
            is_urgent_deadline(deadline, now, OpportunityConfig::urgent_window_days()),
        );

        self.opportunity_repo.update_fields(id, fields).await?;
        self.get(id).await
    }

    /// Removes the listing together with its applications
    pub async fn delete(&self, actor: &AuthenticatedUser, id: ObjectId) -> Result<(), AppError> {
        let opportunity = self.find_opportunity(id).await?;
        actor.ensure_can_manage(&opportunity.posted_by)?;

        self.opportunity_repo.delete(id).await?;
        let removed = self.application_repo.delete_by_opportunity(id).await?;

        log::info!("opportunity {} deleted with {} applications", id.to_hex(), removed);
        Ok(())
    }
}

fn trimmed_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Status defaults to `active`; `urgent=true` selects deadlines inside the
/// urgency window
fn opportunity_filter_document(filter: &OpportunityFilter, now: DateTime, window_days: i64) -> Document {
    let status = filter.status.unwrap_or(OpportunityStatus::Active);
    let mut mongo_filter = doc! { "status": status.as_str() };

    if let Some(kind) = filter.kind {
        mongo_filter.insert("kind", kind.as_str());
    }
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        mongo_filter.insert("category", category);
    }
    if let Some(is_remote) = filter.is_remote {
        mongo_filter.insert("is_remote", is_remote);
    }
    if filter.urgent == Some(true) {
        mongo_filter.insert("deadline", doc! { "$gte": now, "$lte": add_days(now, window_days) });
    }

    mongo_filter
}

fn opportunity_update_document(request: UpdateOpportunityRequest) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(title) = request.title {
        fields.insert("title", validate_required_string(&title, "العنوان")?);
    }
    if let Some(description) = request.description {
        fields.insert("description", description.trim());
    }
    if let Some(organization) = request.organization {
        fields.insert("organization", organization.trim());
    }
    if let Some(kind) = request.kind {
        fields.insert("kind", kind.as_str());
    }
    if let Some(category) = request.category {
        fields.insert("category", category.trim());
    }
    if let Some(location) = request.location {
        fields.insert("location", location.trim());
    }
    if let Some(is_remote) = request.is_remote {
        fields.insert("is_remote", is_remote);
    }
    if let Some(deadline) = request.deadline {
        fields.insert("deadline", from_chrono(deadline));
    }
    if request.requirements.is_some() {
        fields.insert("requirements", trimmed_list(request.requirements));
    }
    if request.benefits.is_some() {
        fields.insert("benefits", trimmed_list(request.benefits));
    }
    if let Some(max_applicants) = request.max_applicants {
        fields.insert("max_applicants", max_applicants as i64);
    }
    if let Some(status) = request.status {
        fields.insert("status", status.as_str());
    }
    if let Some(tags) = request.tags {
        fields.insert("tags", normalize_tags(tags));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::opportunity::OpportunityKind;

    #[test]
    fn test_default_listing_is_active_only() {
        let filter = opportunity_filter_document(&OpportunityFilter::default(), DateTime::now(), 7);
        assert_eq!(filter.get_str("status").unwrap(), "active");
        assert!(!filter.contains_key("deadline"));
    }

    #[test]
    fn test_urgent_filter_uses_window() {
        let now = DateTime::now();
        let filter = opportunity_filter_document(
            &OpportunityFilter { urgent: Some(true), kind: Some(OpportunityKind::Job), ..Default::default() },
            now,
            7,
        );

        let range = filter.get_document("deadline").unwrap();
        assert_eq!(*range.get_datetime("$gte").unwrap(), now);
        assert_eq!(*range.get_datetime("$lte").unwrap(), add_days(now, 7));
        assert_eq!(filter.get_str("kind").unwrap(), "job");
    }

    #[test]
    fn test_update_document_deadline() {
        let deadline = chrono::Utc::now() + chrono::Duration::days(3);
        let fields = opportunity_update_document(UpdateOpportunityRequest {
            deadline: Some(deadline),
            ..Default::default()
        })
        .unwrap();
        assert!(fields.get_datetime("deadline").is_ok());
        assert!(!fields.contains_key("title"));
    }
}
