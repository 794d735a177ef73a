use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::dto::admin::AchievementResponse;
use crate::domain::dto::opportunities::OpportunityCard;
use crate::domain::dto::programs::ProgramCard;
use crate::domain::entities::achievement::Achievement;
use crate::domain::entities::opportunity::Opportunity;
use crate::domain::entities::program::Program;
use crate::domain::entities::user_progress::{
    EnrollmentStatus, ProgressStatistics, SelectionStatus, UserProgress,
};
use crate::utils::datetime::{to_chrono, to_chrono_opt};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledProgramResponse {
    pub program_id: String,
    pub program: Option<ProgramCard>,
    pub status: EnrollmentStatus,
    pub completion_percentage: f64,
    pub completed_lessons: Vec<String>,
    pub hours_spent: f64,
    pub enrolled_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOpportunityResponse {
    pub opportunity_id: String,
    pub opportunity: Option<OpportunityCard>,
    pub status: SelectionStatus,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedAchievementResponse {
    pub achievement_id: String,
    pub achievement: Option<AchievementResponse>,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_programs_enrolled: i64,
    pub total_programs_completed: i64,
    pub total_hours_spent: f64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub total_points: i64,
    pub skill_levels: BTreeMap<String, i64>,
}

impl From<ProgressStatistics> for StatisticsResponse {
    fn from(stats: ProgressStatistics) -> Self {
        Self {
            total_programs_enrolled: stats.total_programs_enrolled,
            total_programs_completed: stats.total_programs_completed,
            total_hours_spent: stats.total_hours_spent,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            last_activity_at: to_chrono_opt(stats.last_activity_at),
            total_points: stats.total_points,
            skill_levels: stats.skill_levels,
        }
    }
}

/// Lookup tables used to populate the progress document
#[derive(Debug, Default)]
pub struct ProgressLookups {
    pub programs: HashMap<ObjectId, Program>,
    pub opportunities: HashMap<ObjectId, Opportunity>,
    pub achievements: HashMap<ObjectId, Achievement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub id: String,
    pub user: String,
    pub enrolled_programs: Vec<EnrolledProgramResponse>,
    pub selected_opportunities: Vec<SelectedOpportunityResponse>,
    pub achievements: Vec<EarnedAchievementResponse>,
    pub statistics: StatisticsResponse,
    pub updated_at: DateTime<Utc>,
}

impl ProgressResponse {
    pub fn new(progress: UserProgress, lookups: &ProgressLookups) -> Self {
        Self {
            id: progress.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: progress.user.to_hex(),
            enrolled_programs: progress
                .enrolled_programs
                .into_iter()
                .map(|e| EnrolledProgramResponse {
                    program_id: e.program.to_hex(),
                    program: lookups.programs.get(&e.program).map(ProgramCard::from),
                    status: e.status,
                    completion_percentage: e.completion_percentage,
                    completed_lessons: e.completed_lessons,
                    hours_spent: e.hours_spent,
                    enrolled_at: to_chrono(e.enrolled_at),
                    last_accessed: to_chrono(e.last_accessed),
                    completed_at: to_chrono_opt(e.completed_at),
                })
                .collect(),
            selected_opportunities: progress
                .selected_opportunities
                .into_iter()
                .map(|s| SelectedOpportunityResponse {
                    opportunity_id: s.opportunity.to_hex(),
                    opportunity: lookups.opportunities.get(&s.opportunity).map(OpportunityCard::from),
                    status: s.status,
                    selected_at: to_chrono(s.selected_at),
                })
                .collect(),
            achievements: progress
                .achievements
                .into_iter()
                .map(|a| EarnedAchievementResponse {
                    achievement_id: a.achievement.to_hex(),
                    achievement: lookups
                        .achievements
                        .get(&a.achievement)
                        .cloned()
                        .map(AchievementResponse::from),
                    earned_at: to_chrono(a.earned_at),
                })
                .collect(),
            statistics: progress.statistics.into(),
            updated_at: to_chrono(progress.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<T: Serialize> {
    #[serde(flatten)]
    pub item: T,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationsResponse {
    pub programs: Vec<Recommendation<ProgramCard>>,
    pub opportunities: Vec<Recommendation<OpportunityCard>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub enrolled_programs: usize,
    pub completed_programs: usize,
    pub in_progress_programs: usize,
    pub selected_opportunities: usize,
    pub achievements: usize,
    pub total_points: i64,
    /// status → count of the user's applications
    pub applications: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub progress: ProgressResponse,
    pub summary: DashboardSummary,
    pub recommendations: RecommendationsResponse,
}

/// Earned and locked achievements with progress towards each
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatusResponse {
    #[serde(flatten)]
    pub achievement: AchievementResponse,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateResponse {
    pub progress: ProgressResponse,
    pub new_achievements: Vec<AchievementResponse>,
}
