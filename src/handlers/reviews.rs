//! `/api/reviews` - one review per user and program; likes and dislikes
//! are mutually exclusive toggles.

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::reviews::request::{CreateReviewRequest, UpdateReviewRequest};
use crate::domain::entities::reactions::ReactionKind;
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::middlewares::AuthMiddleware;
use crate::services::programs::review_service::ReviewService;
use crate::utils::string_utils::parse_object_id;

#[get("/program/{program_id}", wrap = "AuthMiddleware::optional()")]
pub async fn program_reviews(
    viewer: OptionalUser,
    program_id: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let program_id = parse_object_id(&program_id)?;
    let viewer_id = viewer.0.map(|u| u.user_id);

    let page = ReviewService::instance()
        .list_for_program(program_id, &query, viewer_id.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[post("", wrap = "AuthMiddleware::required()")]
pub async fn create_review(
    user: AuthenticatedUser,
    payload: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let review = ReviewService::instance().create(user.user_id, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(review, "تم إضافة التقييم بنجاح")))
}

#[put("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn update_review(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let review = ReviewService::instance().update(&user, id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(review, "تم تحديث التقييم بنجاح")))
}

#[delete("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn delete_review(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    ReviewService::instance().delete(&user, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف التقييم بنجاح")))
}

#[post("/{id}/like", wrap = "AuthMiddleware::required()")]
pub async fn like_review(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let summary = ReviewService::instance().react(user.user_id, id, ReactionKind::Like).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}

#[post("/{id}/dislike", wrap = "AuthMiddleware::required()")]
pub async fn dislike_review(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let summary = ReviewService::instance().react(user.user_id, id, ReactionKind::Dislike).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}
