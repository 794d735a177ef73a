use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::user_progress::ProgressStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    ProgramsCompleted,
    HoursSpent,
    StreakDays,
    CategoriesMastered,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRequirement {
    #[serde(rename = "type")]
    pub kind: RequirementType,
    pub value: f64,
}

impl AchievementRequirement {
    /// Current value of the tracked statistic, `None` for rules that are
    /// never evaluated automatically
    pub fn current_value(&self, stats: &ProgressStatistics) -> Option<f64> {
        match self.kind {
            RequirementType::ProgramsCompleted => Some(stats.total_programs_completed as f64),
            RequirementType::HoursSpent => Some(stats.total_hours_spent),
            RequirementType::StreakDays => Some(stats.current_streak as f64),
            RequirementType::CategoriesMastered | RequirementType::Custom => None,
        }
    }

    pub fn is_met(&self, stats: &ProgressStatistics) -> bool {
        self.current_value(stats)
            .is_some_and(|current| current >= self.value)
    }

    /// Progress towards the threshold in 0.0..=1.0
    pub fn progress_ratio(&self, stats: &ProgressStatistics) -> f64 {
        match self.current_value(stats) {
            Some(_) if self.value <= 0.0 => 1.0,
            Some(current) => (current / self.value).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: String,
    #[serde(default)]
    pub points: i64,
    pub requirements: AchievementRequirement,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_active() -> bool {
    true
}

impl Achievement {
    pub fn new(
        name: &str,
        description: &str,
        icon: &str,
        category: &str,
        points: i64,
        kind: RequirementType,
        value: f64,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category: category.to_string(),
            points,
            requirements: AchievementRequirement { kind, value },
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_earned_by(&self, stats: &ProgressStatistics) -> bool {
        self.is_active && self.requirements.is_met(stats)
    }
}

/// Catalog inserted into an empty `achievements` collection at startup
pub fn default_achievements() -> Vec<Achievement> {
    use RequirementType::*;

    vec![
        Achievement::new("الخطوة الأولى", "أكمل برنامجك الأول", "🎯", "learning", 10, ProgramsCompleted, 1.0),
        Achievement::new("متعلم نشيط", "أكمل خمسة برامج", "📚", "learning", 50, ProgramsCompleted, 5.0),
        Achievement::new("خبير", "أكمل عشرة برامج", "🏆", "learning", 100, ProgramsCompleted, 10.0),
        Achievement::new("عشر ساعات", "اقضِ عشر ساعات في التعلم", "⏱️", "time", 20, HoursSpent, 10.0),
        Achievement::new("مئة ساعة", "اقضِ مئة ساعة في التعلم", "⌛", "time", 150, HoursSpent, 100.0),
        Achievement::new("أسبوع متواصل", "تعلّم سبعة أيام متتالية", "🔥", "streak", 30, StreakDays, 7.0),
        Achievement::new("شهر متواصل", "تعلّم ثلاثين يوماً متتالياً", "💎", "streak", 120, StreakDays, 30.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_evaluation() {
        let stats = ProgressStatistics {
            total_programs_completed: 5,
            total_hours_spent: 4.5,
            current_streak: 7,
            ..Default::default()
        };

        let five = Achievement::new("a", "b", "", "learning", 50, RequirementType::ProgramsCompleted, 5.0);
        let hours = Achievement::new("a", "b", "", "time", 20, RequirementType::HoursSpent, 10.0);
        let streak = Achievement::new("a", "b", "", "streak", 30, RequirementType::StreakDays, 7.0);
        let custom = Achievement::new("a", "b", "", "misc", 5, RequirementType::Custom, 0.0);

        assert!(five.is_earned_by(&stats));
        assert!(!hours.is_earned_by(&stats));
        assert!(streak.is_earned_by(&stats));
        assert!(!custom.is_earned_by(&stats));
        assert_eq!(hours.requirements.progress_ratio(&stats), 0.45);
    }

    #[test]
    fn test_requirement_type_wire_name() {
        let json = serde_json::to_value(AchievementRequirement {
            kind: RequirementType::StreakDays,
            value: 3.0,
        })
        .unwrap();
        assert_eq!(json["type"], "streak_days");
    }
}
