//! Per-user dashboard aggregate.
//!
//! All state transitions of the dashboard live here as plain methods so the
//! service only has to load, mutate and save. Saving is guarded by
//! [`UserProgress::version`]: the repository replaces the document only when
//! the stored version still matches.

use std::collections::BTreeMap;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use crate::core::errors::AppError;
use crate::utils::datetime::day_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Enrolled,
    InProgress,
    Completed,
    Dropped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledProgram {
    pub program: ObjectId,
    pub enrolled_at: DateTime,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    #[serde(default)]
    pub hours_spent: f64,
    pub last_accessed: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    #[default]
    Interested,
    Applied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedOpportunity {
    pub opportunity: ObjectId,
    pub selected_at: DateTime,
    #[serde(default)]
    pub status: SelectionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnedAchievement {
    pub achievement: ObjectId,
    pub earned_at: DateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressStatistics {
    #[serde(default)]
    pub total_programs_enrolled: i64,
    #[serde(default)]
    pub total_programs_completed: i64,
    #[serde(default)]
    pub total_hours_spent: f64,
    #[serde(default)]
    pub current_streak: i64,
    #[serde(default)]
    pub longest_streak: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime>,
    #[serde(default)]
    pub total_points: i64,
    /// category → level, bumped once per completed program
    #[serde(default)]
    pub skill_levels: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressAction {
    LessonCompleted,
    ProgressUpdate,
    ProgramCompleted,
}

/// One progress report for an enrolled program
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub program: ObjectId,
    pub action: ProgressAction,
    pub lesson_id: Option<String>,
    pub completion_percentage: Option<f64>,
    pub time_spent_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    #[serde(default)]
    pub enrolled_programs: Vec<EnrolledProgram>,
    #[serde(default)]
    pub selected_opportunities: Vec<SelectedOpportunity>,
    #[serde(default)]
    pub achievements: Vec<EarnedAchievement>,
    #[serde(default)]
    pub statistics: ProgressStatistics,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl UserProgress {
    pub fn new(user: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            user,
            enrolled_programs: Vec::new(),
            selected_opportunities: Vec::new(),
            achievements: Vec::new(),
            statistics: ProgressStatistics::default(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn enrollment(&self, program: &ObjectId) -> Option<&EnrolledProgram> {
        self.enrolled_programs.iter().find(|e| e.program == *program)
    }

    pub fn is_enrolled(&self, program: &ObjectId) -> bool {
        self.enrollment(program).is_some()
    }

    pub fn enrolled_program_ids(&self) -> Vec<ObjectId> {
        self.enrolled_programs.iter().map(|e| e.program).collect()
    }

    pub fn selected_opportunity_ids(&self) -> Vec<ObjectId> {
        self.selected_opportunities.iter().map(|s| s.opportunity).collect()
    }

    pub fn has_achievement(&self, achievement: &ObjectId) -> bool {
        self.achievements.iter().any(|a| a.achievement == *achievement)
    }

    pub fn count_by_status(&self, status: EnrollmentStatus) -> usize {
        self.enrolled_programs.iter().filter(|e| e.status == status).count()
    }

    /// Categories of completed programs, deduplicated
    pub fn completed_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .enrolled_programs
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Completed && !e.category.is_empty())
            .map(|e| e.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn enroll(&mut self, program: ObjectId, category: String, now: DateTime) -> Result<(), AppError> {
        if self.is_enrolled(&program) {
            return Err(AppError::ValidationError("أنت مسجل بالفعل".to_string()));
        }

        self.enrolled_programs.push(EnrolledProgram {
            program,
            enrolled_at: now,
            status: EnrollmentStatus::Enrolled,
            completion_percentage: 0.0,
            completed_lessons: Vec::new(),
            hours_spent: 0.0,
            last_accessed: now,
            completed_at: None,
            category,
        });

        self.record_activity(now);
        self.recompute_statistics();
        Ok(())
    }

    /// Applies a progress report to the matching enrollment
    pub fn apply_progress(&mut self, update: &ProgressUpdate, now: DateTime) -> Result<(), AppError> {
        let entry = self
            .enrolled_programs
            .iter_mut()
            .find(|e| e.program == update.program)
            .ok_or_else(|| AppError::NotFound("أنت غير مسجل في هذا البرنامج".to_string()))?;

        let mut newly_completed_category = None;

        match update.action {
            ProgressAction::LessonCompleted => {
                let lesson = update
                    .lesson_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| AppError::ValidationError("معرف الدرس مطلوب".to_string()))?;

                if !entry.completed_lessons.iter().any(|l| l == lesson) {
                    entry.completed_lessons.push(lesson.to_string());
                }
                if entry.status == EnrollmentStatus::Enrolled {
                    entry.status = EnrollmentStatus::InProgress;
                }
            }
            ProgressAction::ProgressUpdate => {
                let percentage = update.completion_percentage.ok_or_else(|| {
                    AppError::ValidationError("نسبة الإنجاز مطلوبة".to_string())
                })?;
                entry.completion_percentage = percentage.clamp(0.0, 100.0);
                if matches!(entry.status, EnrollmentStatus::Enrolled | EnrollmentStatus::Dropped) {
                    entry.status = EnrollmentStatus::InProgress;
                }
            }
            ProgressAction::ProgramCompleted => {
                if entry.status != EnrollmentStatus::Completed {
                    entry.status = EnrollmentStatus::Completed;
                    entry.completed_at = Some(now);
                    newly_completed_category = Some(entry.category.clone());
                }
                entry.completion_percentage = 100.0;
            }
        }

        let hours = update
            .time_spent_minutes
            .filter(|m| *m > 0.0)
            .map(|m| m / 60.0)
            .unwrap_or(0.0);
        entry.hours_spent = round2(entry.hours_spent + hours);
        entry.last_accessed = now;

        self.statistics.total_hours_spent = round2(self.statistics.total_hours_spent + hours);
        if let Some(category) = newly_completed_category.filter(|c| !c.is_empty()) {
            *self.statistics.skill_levels.entry(category).or_insert(0) += 1;
        }

        self.record_activity(now);
        self.recompute_statistics();
        Ok(())
    }

    /// Streak bookkeeping on UTC calendar days
    pub fn record_activity(&mut self, now: DateTime) {
        let stats = &mut self.statistics;
        let today = day_index(now);

        stats.current_streak = match stats.last_activity_at.map(day_index) {
            Some(last) if last == today => stats.current_streak.max(1),
            Some(last) if last + 1 == today => stats.current_streak + 1,
            _ => 1,
        };
        stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        stats.last_activity_at = Some(now);
    }

    pub fn recompute_statistics(&mut self) {
        self.statistics.total_programs_enrolled = self.enrolled_programs.len() as i64;
        self.statistics.total_programs_completed =
            self.count_by_status(EnrollmentStatus::Completed) as i64;
    }

    /// Appends every active, not yet owned achievement whose rule is met and
    /// adds its points. Returns the newly earned ones.
    pub fn award_achievements(&mut self, catalog: &[Achievement], now: DateTime) -> Vec<Achievement> {
        let mut earned = Vec::new();

        for achievement in catalog {
            let Some(id) = achievement.id else { continue };
            if self.has_achievement(&id) || !achievement.is_earned_by(&self.statistics) {
                continue;
            }

            self.achievements.push(EarnedAchievement { achievement: id, earned_at: now });
            self.statistics.total_points += achievement.points;
            earned.push(achievement.clone());
        }

        earned
    }

    pub fn select_opportunity(&mut self, opportunity: ObjectId, now: DateTime) -> Result<(), AppError> {
        if self.selected_opportunities.iter().any(|s| s.opportunity == opportunity) {
            return Err(AppError::ValidationError("لقد اخترت هذه الفرصة بالفعل".to_string()));
        }
        self.selected_opportunities.push(SelectedOpportunity {
            opportunity,
            selected_at: now,
            status: SelectionStatus::Interested,
        });
        Ok(())
    }

    pub fn unselect_opportunity(&mut self, opportunity: &ObjectId) -> Result<(), AppError> {
        let before = self.selected_opportunities.len();
        self.selected_opportunities.retain(|s| s.opportunity != *opportunity);
        if self.selected_opportunities.len() == before {
            return Err(AppError::NotFound("الفرصة غير موجودة في قائمتك".to_string()));
        }
        Ok(())
    }

    /// Flags a selected opportunity as applied; selecting it first if needed
    pub fn mark_applied(&mut self, opportunity: ObjectId, now: DateTime) {
        match self
            .selected_opportunities
            .iter_mut()
            .find(|s| s.opportunity == opportunity)
        {
            Some(selection) => selection.status = SelectionStatus::Applied,
            None => self.selected_opportunities.push(SelectedOpportunity {
                opportunity,
                selected_at: now,
                status: SelectionStatus::Applied,
            }),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::achievement::RequirementType;
    use crate::utils::datetime::{add_days, MILLIS_PER_DAY};

    fn day(n: i64) -> DateTime {
        DateTime::from_millis(20_000 * MILLIS_PER_DAY + n * MILLIS_PER_DAY + 3_600_000)
    }

    fn with_id(mut achievement: Achievement) -> Achievement {
        achievement.id = Some(ObjectId::new());
        achievement
    }

    #[test]
    fn test_enroll_twice_rejected() {
        let mut progress = UserProgress::new(ObjectId::new());
        let program = ObjectId::new();

        progress.enroll(program, "technology".into(), day(0)).unwrap();
        match progress.enroll(program, "technology".into(), day(0)) {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "أنت مسجل بالفعل"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(progress.statistics.total_programs_enrolled, 1);
    }

    #[test]
    fn test_lesson_completed_deduplicates() {
        let mut progress = UserProgress::new(ObjectId::new());
        let program = ObjectId::new();
        progress.enroll(program, "design".into(), day(0)).unwrap();

        let update = ProgressUpdate {
            program,
            action: ProgressAction::LessonCompleted,
            lesson_id: Some("lesson-1".into()),
            completion_percentage: None,
            time_spent_minutes: Some(90.0),
        };
        progress.apply_progress(&update, day(0)).unwrap();
        progress.apply_progress(&update, day(0)).unwrap();

        let entry = progress.enrollment(&program).unwrap();
        assert_eq!(entry.completed_lessons, vec!["lesson-1".to_string()]);
        assert_eq!(entry.status, EnrollmentStatus::InProgress);
        assert_eq!(entry.hours_spent, 3.0);
        assert_eq!(progress.statistics.total_hours_spent, 3.0);
    }

    #[test]
    fn test_lesson_completed_requires_lesson_id() {
        let mut progress = UserProgress::new(ObjectId::new());
        let program = ObjectId::new();
        progress.enroll(program, "design".into(), day(0)).unwrap();

        let update = ProgressUpdate {
            program,
            action: ProgressAction::LessonCompleted,
            lesson_id: None,
            completion_percentage: None,
            time_spent_minutes: None,
        };
        assert!(progress.apply_progress(&update, day(0)).is_err());
    }

    #[test]
    fn test_progress_update_clamps() {
        let mut progress = UserProgress::new(ObjectId::new());
        let program = ObjectId::new();
        progress.enroll(program, "design".into(), day(0)).unwrap();

        let update = ProgressUpdate {
            program,
            action: ProgressAction::ProgressUpdate,
            lesson_id: None,
            completion_percentage: Some(140.0),
            time_spent_minutes: None,
        };
        progress.apply_progress(&update, day(0)).unwrap();
        assert_eq!(progress.enrollment(&program).unwrap().completion_percentage, 100.0);
    }

    #[test]
    fn test_unknown_program_is_not_found() {
        let mut progress = UserProgress::new(ObjectId::new());
        let update = ProgressUpdate {
            program: ObjectId::new(),
            action: ProgressAction::ProgramCompleted,
            lesson_id: None,
            completion_percentage: None,
            time_spent_minutes: None,
        };
        assert!(matches!(progress.apply_progress(&update, day(0)), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_program_completed_recomputes_and_levels_once() {
        let mut progress = UserProgress::new(ObjectId::new());
        let program = ObjectId::new();
        progress.enroll(program, "technology".into(), day(0)).unwrap();

        let update = ProgressUpdate {
            program,
            action: ProgressAction::ProgramCompleted,
            lesson_id: None,
            completion_percentage: None,
            time_spent_minutes: None,
        };
        progress.apply_progress(&update, day(1)).unwrap();
        progress.apply_progress(&update, day(1)).unwrap();

        assert_eq!(progress.statistics.total_programs_completed, 1);
        assert_eq!(progress.statistics.skill_levels.get("technology"), Some(&1));
        assert_eq!(progress.completed_categories(), vec!["technology".to_string()]);
        assert_eq!(progress.enrollment(&program).unwrap().completed_at, Some(day(1)));
    }

    #[test]
    fn test_streak_tracking() {
        let mut progress = UserProgress::new(ObjectId::new());

        progress.record_activity(day(0));
        progress.record_activity(day(0));
        assert_eq!(progress.statistics.current_streak, 1);

        progress.record_activity(day(1));
        progress.record_activity(day(2));
        assert_eq!(progress.statistics.current_streak, 3);

        progress.record_activity(add_days(day(2), 3));
        assert_eq!(progress.statistics.current_streak, 1);
        assert_eq!(progress.statistics.longest_streak, 3);
    }

    #[test]
    fn test_achievement_awarded_exactly_once() {
        let mut progress = UserProgress::new(ObjectId::new());
        progress.statistics.total_programs_completed = 5;

        let catalog = vec![
            with_id(Achievement::new("متعلم نشيط", "", "", "learning", 50, RequirementType::ProgramsCompleted, 5.0)),
            with_id(Achievement::new("خبير", "", "", "learning", 100, RequirementType::ProgramsCompleted, 10.0)),
        ];

        let first = progress.award_achievements(&catalog, day(0));
        assert_eq!(first.len(), 1);
        assert_eq!(progress.achievements.len(), 1);
        assert_eq!(progress.statistics.total_points, 50);

        let second = progress.award_achievements(&catalog, day(1));
        assert!(second.is_empty());
        assert_eq!(progress.achievements.len(), 1);
        assert_eq!(progress.statistics.total_points, 50);
    }

    #[test]
    fn test_inactive_achievement_skipped() {
        let mut progress = UserProgress::new(ObjectId::new());
        progress.statistics.current_streak = 10;

        let mut streak = with_id(Achievement::new("s", "", "", "streak", 5, RequirementType::StreakDays, 7.0));
        streak.is_active = false;

        assert!(progress.award_achievements(&[streak], day(0)).is_empty());
    }

    #[test]
    fn test_opportunity_selection() {
        let mut progress = UserProgress::new(ObjectId::new());
        let opp = ObjectId::new();

        progress.select_opportunity(opp, day(0)).unwrap();
        assert!(progress.select_opportunity(opp, day(0)).is_err());

        progress.mark_applied(opp, day(1));
        assert_eq!(progress.selected_opportunities[0].status, SelectionStatus::Applied);

        progress.unselect_opportunity(&opp).unwrap();
        assert!(progress.unselect_opportunity(&opp).is_err());
    }
}
