//! # Progress service
//!
//! Owns the per-user [`UserProgress`] aggregate behind the dashboard:
//! enrollments, lesson/progress reports, opportunity selections, streaks and
//! achievement unlocks.
//!
//! Every mutation is a load → mutate → versioned save cycle. When another
//! request saved in between, the save misses and the cycle is replayed on
//! fresh data, at most [`MAX_SAVE_ATTEMPTS`] times.
//!
//! ```rust,ignore
//! let progress = ProgressService::instance();
//! let result = progress.update_progress(user_id, request).await?;
//! for achievement in &result.new_achievements { /* notify */ }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, DateTime};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::admin::AchievementResponse;
use crate::domain::dto::dashboard::{
    AchievementStatusResponse, DashboardResponse, DashboardSummary, ProgressLookups, ProgressResponse,
    ProgressUpdateResponse, Recommendation, RecommendationsResponse, UpdateProgressRequest,
};
use crate::domain::dto::opportunities::OpportunityCard;
use crate::domain::dto::programs::ProgramCard;
use crate::domain::entities::achievement::Achievement;
use crate::domain::entities::program::Program;
use crate::domain::entities::user_progress::{EnrollmentStatus, ProgressUpdate, UserProgress};
use crate::repositories::opportunities::application_repo::ApplicationRepository;
use crate::repositories::opportunities::opportunity_repo::OpportunityRepository;
use crate::repositories::programs::program_repo::ProgramRepository;
use crate::repositories::progress::achievement_repo::AchievementRepository;
use crate::repositories::progress::user_progress_repo::UserProgressRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::datetime::to_chrono;
use crate::utils::string_utils::parse_object_id;

const MAX_SAVE_ATTEMPTS: usize = 3;
const RECOMMENDATION_LIMIT: i64 = 3;
const PROGRAM_REASON: &str = "بناءً على اهتماماتك";
const OPPORTUNITY_REASON: &str = "فرص تناسب اهتماماتك";

#[service(name = "progress")]
pub struct ProgressService {
    progress_repo: Arc<UserProgressRepository>,
    achievement_repo: Arc<AchievementRepository>,
    program_repo: Arc<ProgramRepository>,
    opportunity_repo: Arc<OpportunityRepository>,
    application_repo: Arc<ApplicationRepository>,
    user_repo: Arc<UserRepository>,
}

impl ProgressService {
    /// One document per user, created on first access
    pub async fn get_or_create_progress(&self, user: ObjectId) -> Result<UserProgress, AppError> {
        if let Some(progress) = self.progress_repo.find_by_user(user).await? {
            return Ok(progress);
        }

        match self.progress_repo.create(UserProgress::new(user)).await {
            Ok(progress) => Ok(progress),
            // A concurrent request created it first
            Err(AppError::DuplicateError(_)) => self
                .progress_repo
                .find_by_user(user)
                .await?
                .ok_or_else(|| AppError::InternalError("progress vanished after duplicate insert".to_string())),
            Err(e) => Err(e),
        }
    }

    /// Runs `mutation` on the latest stored progress and saves it with the
    /// version guard, replaying on a lost race
    async fn mutate<R, F>(&self, user: ObjectId, mut mutation: F) -> Result<(UserProgress, R), AppError>
    where
        F: FnMut(&mut UserProgress) -> Result<R, AppError>,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let mut progress = self.get_or_create_progress(user).await?;
            let outcome = mutation(&mut progress)?;

            if self.progress_repo.save_versioned(&mut progress).await? {
                return Ok((progress, outcome));
            }

            log::warn!(
                "progress of user {} changed concurrently (attempt {}/{})",
                user.to_hex(),
                attempt,
                MAX_SAVE_ATTEMPTS
            );
        }

        Err(AppError::InternalError(format!(
            "progress update for user {} lost {} consecutive races",
            user.to_hex(),
            MAX_SAVE_ATTEMPTS
        )))
    }

    pub async fn enroll_in_program(&self, user: ObjectId, program: &Program) -> Result<ProgressUpdateResponse, AppError> {
        let program_id = program
            .id
            .ok_or_else(|| AppError::InternalError("program has no id".to_string()))?;
        let catalog = self.achievement_repo.find_active().await?;

        let (progress, earned) = self
            .mutate(user, |progress| {
                let now = DateTime::now();
                progress.enroll(program_id, program.category.clone(), now)?;
                Ok(progress.award_achievements(&catalog, now))
            })
            .await?;

        log::info!("user {} enrolled in program {}", user.to_hex(), program_id.to_hex());
        self.log_awards(user, &earned);
        self.update_response(progress, earned).await
    }

    pub async fn update_progress(&self, user: ObjectId, request: UpdateProgressRequest) -> Result<ProgressUpdateResponse, AppError> {
        let update = ProgressUpdate {
            program: parse_object_id(&request.program_id)?,
            action: request.action,
            lesson_id: request.lesson_id,
            completion_percentage: request.completion_percentage,
            time_spent_minutes: request.time_spent_minutes,
        };
        let catalog = self.achievement_repo.find_active().await?;

        let (progress, earned) = self
            .mutate(user, |progress| {
                let now = DateTime::now();
                progress.apply_progress(&update, now)?;
                Ok(progress.award_achievements(&catalog, now))
            })
            .await?;

        self.log_awards(user, &earned);
        self.update_response(progress, earned).await
    }

    /// Re-evaluates the active catalog against the stored statistics
    pub async fn check_and_award_achievements(&self, user: ObjectId) -> Result<Vec<Achievement>, AppError> {
        let catalog = self.achievement_repo.find_active().await?;

        // Nothing new to award: skip the versioned write
        let mut preview = self.get_or_create_progress(user).await?;
        if preview.award_achievements(&catalog, DateTime::now()).is_empty() {
            return Ok(Vec::new());
        }

        let (_, earned) = self
            .mutate(user, |progress| Ok(progress.award_achievements(&catalog, DateTime::now())))
            .await?;

        self.log_awards(user, &earned);
        Ok(earned)
    }

    pub async fn select_opportunity(&self, user: ObjectId, opportunity: ObjectId) -> Result<ProgressResponse, AppError> {
        if self.opportunity_repo.find_by_id(opportunity).await?.is_none() {
            return Err(AppError::NotFound("الفرصة غير موجودة".to_string()));
        }

        let (progress, _) = self
            .mutate(user, |progress| progress.select_opportunity(opportunity, DateTime::now()))
            .await?;
        self.to_response(progress).await
    }

    pub async fn unselect_opportunity(&self, user: ObjectId, opportunity: ObjectId) -> Result<ProgressResponse, AppError> {
        let (progress, _) = self
            .mutate(user, |progress| progress.unselect_opportunity(&opportunity))
            .await?;
        self.to_response(progress).await
    }

    /// Called after a successful application
    pub async fn mark_applied(&self, user: ObjectId, opportunity: ObjectId) -> Result<(), AppError> {
        self.mutate(user, |progress| {
            progress.mark_applied(opportunity, DateTime::now());
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub async fn get_progress(&self, user: ObjectId) -> Result<ProgressResponse, AppError> {
        let progress = self.get_or_create_progress(user).await?;
        self.to_response(progress).await
    }

    pub async fn get_recommendations(&self, user: ObjectId) -> Result<RecommendationsResponse, AppError> {
        let progress = self.get_or_create_progress(user).await?;
        self.recommendations_for(user, &progress).await
    }

    async fn recommendations_for(&self, user: ObjectId, progress: &UserProgress) -> Result<RecommendationsResponse, AppError> {
        let interests = self
            .user_repo
            .find_by_id(user)
            .await?
            .map(|u| u.interests)
            .unwrap_or_default();
        let categories = interest_categories(&interests, &progress.completed_categories());

        if categories.is_empty() {
            return Ok(RecommendationsResponse::default());
        }

        let programs = self
            .program_repo
            .find_recommended(&categories, &progress.enrolled_program_ids(), RECOMMENDATION_LIMIT)
            .await?;
        let opportunities = self
            .opportunity_repo
            .find_recommended(&categories, &progress.selected_opportunity_ids(), RECOMMENDATION_LIMIT)
            .await?;

        Ok(RecommendationsResponse {
            programs: programs
                .iter()
                .map(|p| Recommendation { item: ProgramCard::from(p), reason: PROGRAM_REASON.to_string() })
                .collect(),
            opportunities: opportunities
                .iter()
                .map(|o| Recommendation { item: OpportunityCard::from(o), reason: OPPORTUNITY_REASON.to_string() })
                .collect(),
        })
    }

    pub async fn get_dashboard(&self, user: ObjectId) -> Result<DashboardResponse, AppError> {
        let progress = self.get_or_create_progress(user).await?;

        let recommendations = self.recommendations_for(user, &progress).await?;
        let applications = self.application_repo.count_by_status(user).await?;

        let summary = DashboardSummary {
            enrolled_programs: progress.enrolled_programs.len(),
            completed_programs: progress.count_by_status(EnrollmentStatus::Completed),
            in_progress_programs: progress.count_by_status(EnrollmentStatus::InProgress),
            selected_opportunities: progress.selected_opportunities.len(),
            achievements: progress.achievements.len(),
            total_points: progress.statistics.total_points,
            applications,
        };

        Ok(DashboardResponse {
            progress: self.to_response(progress).await?,
            summary,
            recommendations,
        })
    }

    /// Every active achievement, earned or locked, with the progress ratio
    /// towards its requirement. Achievements added to the catalogue since
    /// the last activity are awarded first.
    pub async fn get_achievements(&self, user: ObjectId) -> Result<Vec<AchievementStatusResponse>, AppError> {
        self.check_and_award_achievements(user).await?;
        let progress = self.get_or_create_progress(user).await?;
        let catalog = self.achievement_repo.find_active().await?;

        let earned: HashMap<ObjectId, DateTime> = progress
            .achievements
            .iter()
            .map(|a| (a.achievement, a.earned_at))
            .collect();

        Ok(catalog
            .into_iter()
            .map(|achievement| {
                let earned_at = achievement.id.and_then(|id| earned.get(&id).copied());
                let ratio = match earned_at {
                    Some(_) => 1.0,
                    None => achievement.requirements.progress_ratio(&progress.statistics),
                };
                AchievementStatusResponse {
                    earned: earned_at.is_some(),
                    earned_at: earned_at.map(to_chrono),
                    progress: ratio,
                    achievement: AchievementResponse::from(achievement),
                }
            })
            .collect())
    }

    async fn update_response(&self, progress: UserProgress, earned: Vec<Achievement>) -> Result<ProgressUpdateResponse, AppError> {
        Ok(ProgressUpdateResponse {
            progress: self.to_response(progress).await?,
            new_achievements: earned.into_iter().map(AchievementResponse::from).collect(),
        })
    }

    /// Populates programs, opportunities and achievements for the response
    async fn to_response(&self, progress: UserProgress) -> Result<ProgressResponse, AppError> {
        let achievement_ids: Vec<ObjectId> = progress.achievements.iter().map(|a| a.achievement).collect();

        let lookups = ProgressLookups {
            programs: self
                .program_repo
                .find_by_ids(&progress.enrolled_program_ids())
                .await?
                .into_iter()
                .filter_map(|p| p.id.map(|id| (id, p)))
                .collect(),
            opportunities: self
                .opportunity_repo
                .find_by_ids(&progress.selected_opportunity_ids())
                .await?
                .into_iter()
                .filter_map(|o| o.id.map(|id| (id, o)))
                .collect(),
            achievements: self
                .achievement_repo
                .find_by_ids(&achievement_ids)
                .await?
                .into_iter()
                .filter_map(|a| a.id.map(|id| (id, a)))
                .collect(),
        };

        Ok(ProgressResponse::new(progress, &lookups))
    }

    fn log_awards(&self, user: ObjectId, earned: &[Achievement]) {
        for achievement in earned {
            log::info!("user {} unlocked achievement '{}'", user.to_hex(), achievement.name);
        }
    }
}

/// User interests plus categories of completed programs, deduplicated
fn interest_categories(interests: &[String], completed: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    interests
        .iter()
        .chain(completed.iter())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_categories_merge() {
        let categories = interest_categories(
            &["tech".into(), "art".into(), " ".into()],
            &["tech".into(), "business".into()],
        );
        assert_eq!(categories, vec!["tech", "art", "business"]);
    }

    #[test]
    fn test_no_interests_no_categories() {
        assert!(interest_categories(&[], &[]).is_empty());
    }
}
