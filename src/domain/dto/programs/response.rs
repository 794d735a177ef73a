use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::users::{UserRef, UserSummaries};
use crate::domain::entities::program::{CurriculumItem, Program, ProgramLevel, RatingSnapshot};
use crate::utils::datetime::{to_chrono, to_chrono_opt};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub category: String,
    pub level: ProgramLevel,
    pub instructor: UserRef,
    pub duration_hours: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
    pub participants_count: usize,
    pub curriculum: Vec<CurriculumItem>,
    pub tags: Vec<String>,
    pub price: f64,
    pub is_active: bool,
    pub is_featured: bool,
    pub ratings: RatingSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgramResponse {
    pub fn new(program: Program, users: &UserSummaries) -> Self {
        Self {
            id: program.id.map(|id| id.to_hex()).unwrap_or_default(),
            instructor: UserRef::resolve(&program.instructor, users),
            participants_count: program.participants.len(),
            title: program.title,
            slug: program.slug,
            description: program.description,
            short_description: program.short_description,
            category: program.category,
            level: program.level,
            duration_hours: program.duration_hours,
            start_date: to_chrono_opt(program.start_date),
            end_date: to_chrono_opt(program.end_date),
            max_participants: program.max_participants,
            curriculum: program.curriculum,
            tags: program.tags,
            price: program.price,
            is_active: program.is_active,
            is_featured: program.is_featured,
            ratings: program.ratings,
            created_at: to_chrono(program.created_at),
            updated_at: to_chrono(program.updated_at),
        }
    }
}

impl From<Program> for ProgramResponse {
    fn from(program: Program) -> Self {
        Self::new(program, &UserSummaries::new())
    }
}

/// Compact card used by dashboard recommendations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramCard {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub category: String,
    pub level: ProgramLevel,
    pub average_rating: f64,
}

impl From<&Program> for ProgramCard {
    fn from(program: &Program) -> Self {
        Self {
            id: program.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: program.title.clone(),
            slug: program.slug.clone(),
            short_description: program.short_description.clone(),
            category: program.category.clone(),
            level: program.level,
            average_rating: program.ratings.average,
        }
    }
}
