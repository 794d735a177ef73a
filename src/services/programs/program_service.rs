//! # Program service
//!
//! Catalog of training programs: listing with filters, detail by id or slug,
//! instructor-owned CRUD and enrollment.
//!
//! Enrollment is checked against the loaded document first so the caller
//! gets a precise message, then written with a conditional `$addToSet`
//! that re-checks activity, duplicates and capacity at write time.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::dashboard::ProgressUpdateResponse;
use crate::domain::dto::programs::{CreateProgramRequest, ProgramFilter, ProgramResponse, UpdateProgramRequest};
use crate::domain::dto::users::UserSummary;
use crate::domain::entities::program::{Program, ProgramLevel, RatingSnapshot};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::programs::program_repo::ProgramRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::services::progress::progress_service::ProgressService;
use crate::utils::datetime::from_chrono;
use crate::utils::string_utils::{clean_optional_string, normalize_tags, parse_object_id, unique_slug, validate_required_string};

#[service(name = "program")]
pub struct ProgramService {
    program_repo: Arc<ProgramRepository>,
    user_repo: Arc<UserRepository>,
}

impl ProgramService {
    pub async fn find_program(&self, key: &str) -> Result<Program, AppError> {
        self.program_repo
            .find_by_id_or_slug(key)
            .await?
            .ok_or_else(|| AppError::NotFound("البرنامج غير موجود".to_string()))
    }

    pub async fn list(
        &self,
        filter: ProgramFilter,
        query: &PageQuery,
        include_inactive: bool,
    ) -> Result<Page<ProgramResponse>, AppError> {
        let mongo_filter = program_filter_document(&filter, include_inactive)?;
        let page = self.program_repo.find_page(mongo_filter, query).await?;

        let instructors: Vec<ObjectId> = page.items.iter().map(|p| p.instructor).collect();
        let users = self.user_repo.summaries(&instructors).await?;

        Ok(page.map(|program| ProgramResponse::new(program, &users)))
    }

    pub async fn get(&self, key: &str) -> Result<ProgramResponse, AppError> {
        let program = self.find_program(key).await?;
        let users = self.user_repo.summaries(&[program.instructor]).await?;
        Ok(ProgramResponse::new(program, &users))
    }

    pub async fn create(&self, actor: &AuthenticatedUser, request: CreateProgramRequest) -> Result<ProgramResponse, AppError> {
        let title = validate_required_string(&request.title, "العنوان")?;
        let id = ObjectId::new();
        let now = DateTime::now();

        let program = Program {
            id: Some(id),
            slug: unique_slug(&title, &id.to_hex()),
            title,
            description: request.description.trim().to_string(),
            short_description: clean_optional_string(request.short_description).unwrap_or_default(),
            category: request.category.trim().to_string(),
            level: request.level.unwrap_or(ProgramLevel::Beginner),
            instructor: actor.user_id,
            duration_hours: request.duration_hours.unwrap_or(0),
            start_date: request.start_date.map(from_chrono),
            end_date: request.end_date.map(from_chrono),
            max_participants: request.max_participants,
            participants: Vec::new(),
            curriculum: request.curriculum.unwrap_or_default(),
            tags: normalize_tags(request.tags.unwrap_or_default()),
            price: request.price.unwrap_or(0.0),
            is_active: true,
            is_featured: request.is_featured.unwrap_or(false),
            ratings: RatingSnapshot::default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.program_repo.create(program).await?;
        log::info!("program '{}' created by {}", created.slug, actor.user_id.to_hex());
        self.get(&id.to_hex()).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, key: &str, request: UpdateProgramRequest) -> Result<ProgramResponse, AppError> {
        let program = self.find_program(key).await?;
        actor.ensure_can_manage(&program.instructor)?;

        let id = program
            .id
            .ok_or_else(|| AppError::InternalError("program has no id".to_string()))?;

        // The merged dates must stay ordered even when only one side changes
        let start = request.start_date.map(from_chrono).or(program.start_date);
        let end = request.end_date.map(from_chrono).or(program.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(AppError::ValidationError("تاريخ الانتهاء يجب أن يكون بعد تاريخ البدء".to_string()));
            }
        }

        let fields = program_update_document(id, request)?;
        if !fields.is_empty() {
            self.program_repo.update_fields(id, fields).await?;
        }
        self.get(&id.to_hex()).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, key: &str) -> Result<(), AppError> {
        let program = self.find_program(key).await?;
        actor.ensure_can_manage(&program.instructor)?;

        if let Some(id) = program.id {
            self.program_repo.delete(id).await?;
            log::info!("program {} deleted by {}", id.to_hex(), actor.user_id.to_hex());
        }
        Ok(())
    }

    pub async fn participants(&self, actor: &AuthenticatedUser, key: &str) -> Result<Vec<UserSummary>, AppError> {
        let program = self.find_program(key).await?;
        actor.ensure_can_manage(&program.instructor)?;

        let users = self.user_repo.summaries(&program.participants).await?;
        Ok(program
            .participants
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    /// Adds the caller to the program and records the enrollment on the
    /// dashboard. The participant is removed again when the dashboard write
    /// fails so both sides stay consistent.
    pub async fn enroll(&self, user: ObjectId, key: &str) -> Result<ProgressUpdateResponse, AppError> {
        let program = self.find_program(key).await?;
        program.check_enrollment(&user)?;

        let id = program
            .id
            .ok_or_else(|| AppError::InternalError("program has no id".to_string()))?;

        if !self.program_repo.add_participant(id, user).await? {
            // Lost a race; re-read to report the precise reason
            let current = self.find_program(&id.to_hex()).await?;
            current.check_enrollment(&user)?;
            return Err(AppError::ValidationError("البرنامج غير متاح للتسجيل".to_string()));
        }

        match ProgressService::instance().enroll_in_program(user, &program).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.program_repo.remove_participant(id, user).await?;
                Err(e)
            }
        }
    }
}

fn program_filter_document(filter: &ProgramFilter, include_inactive: bool) -> Result<Document, AppError> {
    let mut mongo_filter = Document::new();

    if !include_inactive {
        mongo_filter.insert("is_active", true);
    }
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        mongo_filter.insert("category", category);
    }
    if let Some(level) = filter.level {
        mongo_filter.insert("level", level.as_str());
    }
    if let Some(featured) = filter.featured {
        mongo_filter.insert("is_featured", featured);
    }
    if let Some(instructor) = filter.instructor.as_deref() {
        mongo_filter.insert("instructor", parse_object_id(instructor)?);
    }

    Ok(mongo_filter)
}

/// `$set` document for a program patch; a new title regenerates the slug
fn program_update_document(id: ObjectId, request: UpdateProgramRequest) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(title) = request.title {
        let title = validate_required_string(&title, "العنوان")?;
        fields.insert("slug", unique_slug(&title, &id.to_hex()));
        fields.insert("title", title);
    }
    if let Some(description) = request.description {
        fields.insert("description", description.trim());
    }
    if let Some(short_description) = request.short_description {
        fields.insert("short_description", short_description.trim());
    }
    if let Some(category) = request.category {
        fields.insert("category", category.trim());
    }
    if let Some(level) = request.level {
        fields.insert("level", level.as_str());
    }
    if let Some(duration_hours) = request.duration_hours {
        fields.insert("duration_hours", duration_hours as i64);
    }
    if let Some(start_date) = request.start_date {
        fields.insert("start_date", from_chrono(start_date));
    }
    if let Some(end_date) = request.end_date {
        fields.insert("end_date", from_chrono(end_date));
    }
    if let Some(max_participants) = request.max_participants {
        fields.insert("max_participants", max_participants as i64);
    }
    if let Some(curriculum) = request.curriculum {
        fields.insert("curriculum", to_bson(&curriculum)?);
    }
    if let Some(tags) = request.tags {
        fields.insert("tags", normalize_tags(tags));
    }
    if let Some(price) = request.price {
        fields.insert("price", price);
    }
    if let Some(is_active) = request.is_active {
        fields.insert("is_active", is_active);
    }
    if let Some(is_featured) = request.is_featured {
        fields.insert("is_featured", is_featured);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_listing_hides_inactive() {
        let filter = ProgramFilter { level: Some(ProgramLevel::Advanced), ..Default::default() };

        let public = program_filter_document(&filter, false).unwrap();
        assert_eq!(public.get_bool("is_active").unwrap(), true);
        assert_eq!(public.get_str("level").unwrap(), "advanced");

        let admin = program_filter_document(&filter, true).unwrap();
        assert!(!admin.contains_key("is_active"));
    }

    #[test]
    fn test_bad_instructor_id_rejected() {
        let filter = ProgramFilter { instructor: Some("nope".into()), ..Default::default() };
        assert!(matches!(program_filter_document(&filter, false), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_title_change_regenerates_slug() {
        let id = ObjectId::new();
        let request = UpdateProgramRequest { title: Some("Data Science 101".into()), ..Default::default() };

        let fields = program_update_document(id, request).unwrap();
        assert_eq!(fields.get_str("slug").unwrap(), unique_slug("Data Science 101", &id.to_hex()));
        assert!(!fields.contains_key("price"));
    }
}
