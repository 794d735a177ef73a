//! Platform-wide counters for the admin dashboard.

use std::sync::Arc;

use mongodb::bson::doc;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::admin::PlatformStats;
use crate::repositories::community::event_repo::EventRepository;
use crate::repositories::community::post_repo::PostRepository;
use crate::repositories::opportunities::application_repo::ApplicationRepository;
use crate::repositories::opportunities::opportunity_repo::OpportunityRepository;
use crate::repositories::programs::program_repo::ProgramRepository;
use crate::repositories::programs::review_repo::ReviewRepository;
use crate::repositories::progress::achievement_repo::AchievementRepository;
use crate::repositories::users::user_repo::UserRepository;

#[service(name = "admin")]
pub struct AdminService {
    user_repo: Arc<UserRepository>,
    program_repo: Arc<ProgramRepository>,
    review_repo: Arc<ReviewRepository>,
    opportunity_repo: Arc<OpportunityRepository>,
    application_repo: Arc<ApplicationRepository>,
    event_repo: Arc<EventRepository>,
    post_repo: Arc<PostRepository>,
    achievement_repo: Arc<AchievementRepository>,
}

impl AdminService {
    pub async fn stats(&self) -> Result<PlatformStats, AppError> {
        Ok(PlatformStats {
            users: self.user_repo.count(doc! {}).await?,
            active_users: self.user_repo.count(doc! { "is_active": true }).await?,
            programs: self.program_repo.count(doc! {}).await?,
            active_programs: self.program_repo.count(doc! { "is_active": true }).await?,
            opportunities: self.opportunity_repo.count(doc! {}).await?,
            active_opportunities: self.opportunity_repo.count(doc! { "status": "active" }).await?,
            applications: self.application_repo.count(doc! {}).await?,
            pending_applications: self.application_repo.count(doc! { "status": "pending" }).await?,
            events: self.event_repo.count(doc! {}).await?,
            posts: self.post_repo.count(doc! { "is_deleted": false }).await?,
            published_posts: self
                .post_repo
                .count(doc! { "is_deleted": false, "status": "published" })
                .await?,
            reviews: self.review_repo.count(doc! { "is_deleted": false }).await?,
            achievements: self.achievement_repo.count(doc! {}).await?,
        })
    }
}
