//! # Review service
//!
//! Program reviews by enrolled participants, one per user and program.
//! Every create, update and delete refreshes the program's rating snapshot
//! from a `$group` histogram of the live reviews.

use std::sync::Arc;

use mongodb::bson::{oid::ObjectId, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::posts::ReactionSummary;
use crate::domain::dto::reviews::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use crate::domain::entities::program::RatingSnapshot;
use crate::domain::entities::reactions::ReactionKind;
use crate::domain::entities::review::Review;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::programs::program_repo::ProgramRepository;
use crate::repositories::programs::review_repo::ReviewRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::string_utils::{clean_optional_string, parse_object_id};

const DUPLICATE_REVIEW: &str = "لقد قمت بتقييم هذا البرنامج مسبقاً";

#[service(name = "review")]
pub struct ReviewService {
    review_repo: Arc<ReviewRepository>,
    program_repo: Arc<ProgramRepository>,
    user_repo: Arc<UserRepository>,
}

impl ReviewService {
    async fn find_review(&self, id: ObjectId) -> Result<Review, AppError> {
        self.review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("التقييم غير موجود".to_string()))
    }

    async fn respond(&self, review: Review, viewer: Option<&ObjectId>) -> Result<ReviewResponse, AppError> {
        let users = self.user_repo.summaries(&[review.author]).await?;
        Ok(ReviewResponse::new(review, &users, viewer))
    }

    pub async fn list_for_program(
        &self,
        program: ObjectId,
        query: &PageQuery,
        viewer: Option<&ObjectId>,
    ) -> Result<Page<ReviewResponse>, AppError> {
        let page = self.review_repo.find_page_for_program(program, query).await?;

        let authors: Vec<ObjectId> = page.items.iter().map(|r| r.author).collect();
        let users = self.user_repo.summaries(&authors).await?;

        Ok(page.map(|review| ReviewResponse::new(review, &users, viewer)))
    }

    pub async fn create(&self, author: ObjectId, request: CreateReviewRequest) -> Result<ReviewResponse, AppError> {
        let program_id = parse_object_id(&request.program_id)?;
        let program = self
            .program_repo
            .find_by_id(program_id)
            .await?
            .ok_or_else(|| AppError::NotFound("البرنامج غير موجود".to_string()))?;

        if !program.is_participant(&author) {
            return Err(AppError::AuthorizationError("يجب التسجيل في البرنامج قبل تقييمه".to_string()));
        }
        if self.review_repo.find_by_author_and_program(author, program_id).await?.is_some() {
            return Err(AppError::DuplicateError(DUPLICATE_REVIEW.to_string()));
        }

        let review = Review::new(
            program_id,
            author,
            request.rating,
            clean_optional_string(request.title),
            request.comment.trim().to_string(),
        );

        let created = self.review_repo.create(review).await.map_err(|e| match e {
            AppError::DuplicateError(_) => AppError::DuplicateError(DUPLICATE_REVIEW.to_string()),
            other => other,
        })?;

        self.update_program_rating_stats(program_id).await?;
        self.respond(created, Some(&author)).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, id: ObjectId, request: UpdateReviewRequest) -> Result<ReviewResponse, AppError> {
        let review = self.find_review(id).await?;
        if !review.is_owned_by(&actor.user_id) {
            return Err(AppError::forbidden());
        }

        let fields = review_update_document(request);
        if fields.is_empty() {
            return self.respond(review, Some(&actor.user_id)).await;
        }

        let rating_changed = fields.contains_key("rating");
        let updated = self
            .review_repo
            .update_fields(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("التقييم غير موجود".to_string()))?;

        if rating_changed {
            self.update_program_rating_stats(updated.program).await?;
        }
        self.respond(updated, Some(&actor.user_id)).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: ObjectId) -> Result<(), AppError> {
        let review = self.find_review(id).await?;
        actor.ensure_can_manage(&review.author)?;

        if self.review_repo.soft_delete(id).await? {
            self.update_program_rating_stats(review.program).await?;
        }
        Ok(())
    }

    pub async fn react(&self, user: ObjectId, id: ObjectId, kind: ReactionKind) -> Result<ReactionSummary, AppError> {
        let mut review = self.find_review(id).await?;
        self.review_repo.toggle_reaction(&review, user, kind).await?;

        review.reactions.toggle(user, kind);
        Ok(ReactionSummary::new(&review.reactions, Some(&user)))
    }

    /// Recomputes average, count and distribution onto the program
    pub async fn update_program_rating_stats(&self, program: ObjectId) -> Result<RatingSnapshot, AppError> {
        let histogram = self.review_repo.rating_histogram(program).await?;
        let snapshot = RatingSnapshot::from_histogram(&histogram);

        self.program_repo.set_ratings(program, &snapshot).await?;
        log::debug!(
            "program {} ratings: {} over {} reviews",
            program.to_hex(),
            snapshot.average,
            snapshot.count
        );
        Ok(snapshot)
    }
}

fn review_update_document(request: UpdateReviewRequest) -> Document {
    let mut fields = Document::new();
    if let Some(rating) = request.rating {
        fields.insert("rating", rating);
    }
    if let Some(title) = request.title {
        match clean_optional_string(Some(title)) {
            Some(title) => fields.insert("title", title),
            None => fields.insert("title", mongodb::bson::Bson::Null),
        };
    }
    if let Some(comment) = request.comment {
        fields.insert("comment", comment.trim());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_patch() {
        let fields = review_update_document(UpdateReviewRequest {
            rating: Some(4),
            title: Some("  ".into()),
            comment: None,
        });
        assert_eq!(fields.get_i32("rating").unwrap(), 4);
        assert!(fields.is_null("title"));
        assert!(!fields.contains_key("comment"));
    }
}
