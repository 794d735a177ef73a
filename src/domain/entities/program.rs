use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgramLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ProgramLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramLevel::Beginner => "beginner",
            ProgramLevel::Intermediate => "intermediate",
            ProgramLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub order: u32,
}

/// Per-star review counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub rating1: i64,
    pub rating2: i64,
    pub rating3: i64,
    pub rating4: i64,
    pub rating5: i64,
}

/// Denormalized review summary stored on the program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub average: f64,
    pub count: i64,
    pub distribution: RatingDistribution,
}

impl RatingSnapshot {
    /// Builds the snapshot from `(rating, count)` pairs as produced by a
    /// `$group` on the rating field. Ratings outside 1..=5 are ignored.
    pub fn from_histogram(histogram: &[(i32, i64)]) -> Self {
        let mut distribution = RatingDistribution::default();
        let mut count = 0i64;
        let mut sum = 0i64;

        for &(rating, n) in histogram {
            let slot = match rating {
                1 => &mut distribution.rating1,
                2 => &mut distribution.rating2,
                3 => &mut distribution.rating3,
                4 => &mut distribution.rating4,
                5 => &mut distribution.rating5,
                _ => continue,
            };
            *slot += n;
            count += n;
            sum += rating as i64 * n;
        }

        let average = if count == 0 {
            0.0
        } else {
            ((sum as f64 / count as f64) * 10.0).round() / 10.0
        };

        Self { average, count, distribution }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub category: String,
    #[serde(default)]
    pub level: ProgramLevel,
    pub instructor: ObjectId,
    #[serde(default)]
    pub duration_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub participants: Vec<ObjectId>,
    #[serde(default)]
    pub curriculum: Vec<CurriculumItem>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: f64,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub ratings: RatingSnapshot,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Program {
    pub fn is_participant(&self, user: &ObjectId) -> bool {
        self.participants.contains(user)
    }

    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.participants.len() as u32 >= max)
    }

    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.instructor == *user
    }

    /// Enrollment preconditions, checked before the atomic `$addToSet`
    pub fn check_enrollment(&self, user: &ObjectId) -> Result<(), AppError> {
        if !self.is_active {
            return Err(AppError::ValidationError("البرنامج غير متاح للتسجيل".to_string()));
        }
        if self.is_participant(user) {
            return Err(AppError::ValidationError("أنت مسجل بالفعل".to_string()));
        }
        if self.is_full() {
            return Err(AppError::ValidationError("البرنامج مكتمل".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(ratings: &[i32]) -> RatingSnapshot {
        let histogram: Vec<(i32, i64)> = ratings.iter().map(|&r| (r, 1)).collect();
        RatingSnapshot::from_histogram(&histogram)
    }

    fn program(max: Option<u32>) -> Program {
        let now = DateTime::now();
        Program {
            id: Some(ObjectId::new()),
            title: "أساسيات البرمجة".into(),
            slug: "intro".into(),
            description: "وصف".into(),
            short_description: String::new(),
            category: "technology".into(),
            level: ProgramLevel::Beginner,
            instructor: ObjectId::new(),
            duration_hours: 10,
            start_date: None,
            end_date: None,
            max_participants: max,
            participants: Vec::new(),
            curriculum: Vec::new(),
            tags: Vec::new(),
            price: 0.0,
            is_active: true,
            is_featured: false,
            ratings: RatingSnapshot::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rating_snapshot_rounds_to_one_decimal() {
        let snapshot = snapshot_of(&[5, 5, 4, 3]);

        assert_eq!(snapshot.average, 4.3);
        assert_eq!(snapshot.count, 4);
        assert_eq!(
            snapshot.distribution,
            RatingDistribution { rating1: 0, rating2: 0, rating3: 1, rating4: 1, rating5: 2 }
        );
    }

    #[test]
    fn test_rating_snapshot_empty_and_out_of_range() {
        assert_eq!(RatingSnapshot::from_histogram(&[]), RatingSnapshot::default());

        let snapshot = RatingSnapshot::from_histogram(&[(0, 3), (4, 2)]);
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.average, 4.0);
    }

    #[test]
    fn test_enrolling_twice_is_rejected() {
        let user = ObjectId::new();
        let mut p = program(None);
        assert!(p.check_enrollment(&user).is_ok());

        p.participants.push(user);
        match p.check_enrollment(&user) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "أنت مسجل بالفعل"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_full_program_rejects() {
        let mut p = program(Some(1));
        p.participants.push(ObjectId::new());

        match p.check_enrollment(&ObjectId::new()) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "البرنامج مكتمل"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
