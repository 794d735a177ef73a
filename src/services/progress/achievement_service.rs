//! Achievement catalog administration and startup seeding.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::admin::{AchievementResponse, CreateAchievementRequest, UpdateAchievementRequest};
use crate::domain::entities::achievement::{default_achievements, Achievement, AchievementRequirement};
use crate::repositories::progress::achievement_repo::AchievementRepository;
use crate::utils::string_utils::validate_required_string;

#[service(name = "achievement")]
pub struct AchievementService {
    achievement_repo: Arc<AchievementRepository>,
}

impl AchievementService {
    pub async fn list(&self) -> Result<Vec<AchievementResponse>, AppError> {
        let achievements = self.achievement_repo.find_all().await?;
        Ok(achievements.into_iter().map(AchievementResponse::from).collect())
    }

    pub async fn create(&self, request: CreateAchievementRequest) -> Result<AchievementResponse, AppError> {
        let mut achievement = Achievement::new(
            &validate_required_string(&request.name, "اسم الإنجاز")?,
            request.description.trim(),
            request.icon.as_deref().unwrap_or_default(),
            request.category.trim(),
            request.points.unwrap_or(0),
            request.requirements.kind,
            request.requirements.value,
        );
        achievement.is_active = request.is_active.unwrap_or(true);

        let created = self.achievement_repo.create(achievement).await.map_err(|e| match e {
            AppError::DuplicateError(_) => AppError::DuplicateError("يوجد إنجاز بنفس الاسم".to_string()),
            other => other,
        })?;

        log::info!("achievement '{}' created", created.name);
        Ok(AchievementResponse::from(created))
    }

    pub async fn update(&self, id: ObjectId, request: UpdateAchievementRequest) -> Result<AchievementResponse, AppError> {
        let fields = achievement_update_document(request)?;

        let updated = if fields.is_empty() {
            self.achievement_repo.find_by_id(id).await?
        } else {
            self.achievement_repo.update_fields(id, fields).await?
        };

        updated
            .map(AchievementResponse::from)
            .ok_or_else(|| AppError::NotFound("الإنجاز غير موجود".to_string()))
    }

    /// Earned entries referencing a deleted achievement are left in place;
    /// the dashboard renders them without details
    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        if !self.achievement_repo.delete(id).await? {
            return Err(AppError::NotFound("الإنجاز غير موجود".to_string()));
        }
        Ok(())
    }

    /// Inserts the default catalog into an empty collection
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        if self.achievement_repo.count(doc! {}).await? > 0 {
            return Ok(0);
        }
        self.achievement_repo.insert_many(&default_achievements()).await
    }
}

fn achievement_update_document(request: UpdateAchievementRequest) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(name) = request.name {
        fields.insert("name", validate_required_string(&name, "اسم الإنجاز")?);
    }
    if let Some(description) = request.description {
        fields.insert("description", description.trim());
    }
    if let Some(icon) = request.icon {
        fields.insert("icon", icon.trim());
    }
    if let Some(category) = request.category {
        fields.insert("category", category.trim());
    }
    if let Some(points) = request.points {
        fields.insert("points", points);
    }
    if let Some(requirements) = request.requirements {
        let requirement = AchievementRequirement { kind: requirements.kind, value: requirements.value };
        fields.insert("requirements", to_bson(&requirement)?);
    }
    if let Some(is_active) = request.is_active {
        fields.insert("is_active", is_active);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::admin::RequirementRequest;
    use crate::domain::entities::achievement::RequirementType;

    #[test]
    fn test_requirement_update_uses_type_key() {
        let request = UpdateAchievementRequest {
            requirements: Some(RequirementRequest { kind: RequirementType::StreakDays, value: 14.0 }),
            is_active: Some(false),
            ..Default::default()
        };

        let fields = achievement_update_document(request).unwrap();
        let requirements = fields.get_document("requirements").unwrap();
        assert_eq!(requirements.get_str("type").unwrap(), "streak_days");
        assert_eq!(fields.get_bool("is_active").unwrap(), false);
        assert!(!fields.contains_key("name"));
    }
}
