//! `/api/dashboard` - the signed-in user's progress, selections,
//! achievements and recommendations. The whole scope requires a token.

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::dashboard::request::UpdateProgressRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::programs::program_service::ProgramService;
use crate::services::progress::progress_service::ProgressService;
use crate::utils::string_utils::parse_object_id;

#[get("")]
pub async fn dashboard(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let dashboard = ProgressService::instance().get_dashboard(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(dashboard)))
}

#[get("/progress")]
pub async fn get_progress(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let progress = ProgressService::instance().get_progress(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(progress)))
}

#[put("/progress")]
pub async fn update_progress(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProgressRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let update = ProgressService::instance()
        .update_progress(user.user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(update, "تم تحديث التقدم")))
}

/// Same effect as `POST /api/programs/{id}/enroll`
#[post("/programs/{id}/enroll")]
pub async fn enroll(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let update = ProgramService::instance().enroll(user.user_id, &id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(update, "تم التسجيل في البرنامج بنجاح")))
}

#[post("/opportunities/{id}/select")]
pub async fn select_opportunity(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let progress = ProgressService::instance().select_opportunity(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(progress, "تم حفظ الفرصة")))
}

#[delete("/opportunities/{id}/select")]
pub async fn unselect_opportunity(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let progress = ProgressService::instance().unselect_opportunity(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(progress, "تم إلغاء حفظ الفرصة")))
}

#[get("/achievements")]
pub async fn achievements(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let achievements = ProgressService::instance().get_achievements(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(achievements)))
}

#[get("/recommendations")]
pub async fn recommendations(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let recommendations = ProgressService::instance().get_recommendations(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(recommendations)))
}
