use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::achievement::{Achievement, AchievementRequirement};
use crate::utils::datetime::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub points: i64,
    pub requirements: AchievementRequirement,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Achievement> for AchievementResponse {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: achievement.name,
            description: achievement.description,
            icon: achievement.icon,
            category: achievement.category,
            points: achievement.points,
            requirements: achievement.requirements,
            is_active: achievement.is_active,
            created_at: to_chrono(achievement.created_at),
        }
    }
}

/// `GET /api/admin/stats`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub users: u64,
    pub active_users: u64,
    pub programs: u64,
    pub active_programs: u64,
    pub opportunities: u64,
    pub active_opportunities: u64,
    pub applications: u64,
    pub pending_applications: u64,
    pub events: u64,
    pub posts: u64,
    pub published_posts: u64,
    pub reviews: u64,
    pub achievements: u64,
}
