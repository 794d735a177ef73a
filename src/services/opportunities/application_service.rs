//! # Application service
//!
//! Applying to opportunities and moving applications through their review
//! workflow.
//!
//! ```text
//! pending ──► reviewing ──► shortlisted ──► accepted
//!    │            │   └──────────────────► accepted
//!    └────────────┴───────────┴──────────► rejected
//! pending ──► withdrawn   (applicant only)
//! ```
//!
//! Status changes are conditional on the status that was read, so two
//! concurrent updates cannot both succeed and a withdrawal never releases
//! the applicant slot twice.

use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::applications::{
    ApplicationFilter, ApplicationResponse, CreateApplicationRequest, UpdateApplicationStatusRequest,
};
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::entities::application::{withdraw_rejected, Application, ApplicationStatus};
use crate::domain::entities::opportunity::Opportunity;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::opportunities::application_repo::ApplicationRepository;
use crate::repositories::opportunities::opportunity_repo::OpportunityRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::services::progress::progress_service::ProgressService;
use crate::utils::string_utils::{clean_optional_string, parse_object_id};

const DUPLICATE_APPLICATION: &str = "لقد تقدمت لهذه الفرصة مسبقاً";

#[service(name = "application")]
pub struct ApplicationService {
    application_repo: Arc<ApplicationRepository>,
    opportunity_repo: Arc<OpportunityRepository>,
    user_repo: Arc<UserRepository>,
}

impl ApplicationService {
    async fn find_application(&self, id: ObjectId) -> Result<Application, AppError> {
        self.application_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("الطلب غير موجود".to_string()))
    }

    async fn find_opportunity(&self, id: ObjectId) -> Result<Opportunity, AppError> {
        self.opportunity_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("الفرصة غير موجودة".to_string()))
    }

    async fn respond_page(&self, page: Page<Application>) -> Result<Page<ApplicationResponse>, AppError> {
        let applicants: Vec<ObjectId> = page.items.iter().map(|a| a.applicant).collect();
        let opportunity_ids: Vec<ObjectId> = page.items.iter().map(|a| a.opportunity).collect();

        let users = self.user_repo.summaries(&applicants).await?;
        let opportunities = self.opportunity_map(&opportunity_ids).await?;

        Ok(page.map(|application| ApplicationResponse::new(application, &users, &opportunities)))
    }

    async fn respond(&self, application: Application) -> Result<ApplicationResponse, AppError> {
        let users = self.user_repo.summaries(&[application.applicant]).await?;
        let opportunities = self.opportunity_map(&[application.opportunity]).await?;
        Ok(ApplicationResponse::new(application, &users, &opportunities))
    }

    async fn opportunity_map(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Opportunity>, AppError> {
        Ok(self
            .opportunity_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .filter_map(|o| o.id.map(|id| (id, o)))
            .collect())
    }

    /// Creates the application, then claims an applicant slot. The
    /// application is removed again when the slot could not be claimed.
    pub async fn apply(
        &self,
        applicant: ObjectId,
        opportunity_id: Option<ObjectId>,
        request: CreateApplicationRequest,
    ) -> Result<ApplicationResponse, AppError> {
        let opportunity_id = match (opportunity_id, request.opportunity_id.as_deref()) {
            (Some(id), _) => id,
            (None, Some(raw)) => parse_object_id(raw)?,
            (None, None) => return Err(AppError::ValidationError("معرف الفرصة مطلوب".to_string())),
        };

        let opportunity = self.find_opportunity(opportunity_id).await?;
        opportunity.check_application(DateTime::now())?;

        let application = Application::new(
            applicant,
            opportunity_id,
            request.cover_letter.map(|c| c.trim().to_string()).unwrap_or_default(),
            clean_optional_string(request.resume_url),
            request.answers.unwrap_or_default(),
        );

        let created = self.application_repo.create(application).await.map_err(|e| match e {
            AppError::DuplicateError(_) => AppError::DuplicateError(DUPLICATE_APPLICATION.to_string()),
            other => other,
        })?;
        let application_id = created
            .id
            .ok_or_else(|| AppError::InternalError("application has no id".to_string()))?;

        if !self.opportunity_repo.add_applicant(opportunity_id, applicant).await? {
            self.application_repo.delete(application_id).await?;

            let current = self.find_opportunity(opportunity_id).await?;
            current.check_application(DateTime::now())?;
            return Err(AppError::ValidationError("هذه الفرصة غير متاحة للتقديم".to_string()));
        }

        log::info!(
            "user {} applied to opportunity {}",
            applicant.to_hex(),
            opportunity_id.to_hex()
        );

        // The dashboard flag is secondary; the application stands either way
        if let Err(e) = ProgressService::instance().mark_applied(applicant, opportunity_id).await {
            log::warn!("could not flag opportunity {} as applied: {}", opportunity_id.to_hex(), e);
        }

        self.respond(created).await
    }

    pub async fn list_mine(
        &self,
        applicant: ObjectId,
        filter: ApplicationFilter,
        query: &PageQuery,
    ) -> Result<Page<ApplicationResponse>, AppError> {
        let mut mongo_filter = doc! { "applicant": applicant };
        if let Some(status) = filter.status {
            mongo_filter.insert("status", status.as_str());
        }

        let page = self.application_repo.find_page(mongo_filter, query).await?;
        self.respond_page(page).await
    }

    /// Visible to the applicant, the opportunity poster and admins
    pub async fn get(&self, actor: &AuthenticatedUser, id: ObjectId) -> Result<ApplicationResponse, AppError> {
        let application = self.find_application(id).await?;

        if application.applicant != actor.user_id && !actor.is_admin() {
            let opportunity = self.find_opportunity(application.opportunity).await?;
            actor.ensure_can_manage(&opportunity.posted_by)?;
        }

        self.respond(application).await
    }

    pub async fn list_for_opportunity(
        &self,
        actor: &AuthenticatedUser,
        opportunity_id: ObjectId,
        filter: ApplicationFilter,
        query: &PageQuery,
    ) -> Result<Page<ApplicationResponse>, AppError> {
        let opportunity = self.find_opportunity(opportunity_id).await?;
        actor.ensure_can_manage(&opportunity.posted_by)?;

        let mut mongo_filter = doc! { "opportunity": opportunity_id };
        if let Some(status) = filter.status {
            mongo_filter.insert("status", status.as_str());
        }

        let page = self.application_repo.find_page(mongo_filter, query).await?;
        self.respond_page(page).await
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: ObjectId,
        request: UpdateApplicationStatusRequest,
    ) -> Result<ApplicationResponse, AppError> {
        let application = self.find_application(id).await?;
        let opportunity = self.find_opportunity(application.opportunity).await?;
        actor.ensure_can_manage(&opportunity.posted_by)?;

        application.check_transition(request.status)?;

        let updated = self
            .application_repo
            .transition(
                id,
                application.status,
                request.status,
                actor.user_id,
                clean_optional_string(request.notes),
                true,
            )
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("تم تغيير حالة الطلب من قبل مستخدم آخر، يرجى إعادة المحاولة".to_string())
            })?;

        log::info!(
            "application {} moved {} -> {} by {}",
            id.to_hex(),
            application.status.as_str(),
            request.status.as_str(),
            actor.user_id.to_hex()
        );
        self.respond(updated).await
    }

    /// Applicant only, while still pending. The slot is released only by
    /// the request whose conditional update actually matched.
    pub async fn withdraw(&self, actor: &AuthenticatedUser, id: ObjectId) -> Result<ApplicationResponse, AppError> {
        let application = self.find_application(id).await?;
        if application.applicant != actor.user_id {
            return Err(AppError::forbidden());
        }
        application.check_withdraw()?;

        let updated = self
            .application_repo
            .transition(
                id,
                ApplicationStatus::Pending,
                ApplicationStatus::Withdrawn,
                actor.user_id,
                None,
                false,
            )
            .await?
            .ok_or_else(withdraw_rejected)?;

        self.opportunity_repo
            .remove_applicant(application.opportunity, application.applicant)
            .await?;

        log::info!("application {} withdrawn", id.to_hex());
        self.respond(updated).await
    }
}
