//! `/api/admin` - platform statistics, user management, achievement
//! catalogue and CMS content. Mounted behind an admin-only scope.

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::admin::request::{CreateAchievementRequest, UpdateAchievementRequest};
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::content::request::{ContentFilter, CreateContentRequest, UpdateContentRequest};
use crate::domain::dto::users::request::{UpdateRoleRequest, UpdateStatusRequest, UserFilter};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::admin::admin_service::AdminService;
use crate::services::content::content_service::ContentService;
use crate::services::progress::achievement_service::AchievementService;
use crate::services::users::user_service::UserService;
use crate::utils::string_utils::parse_object_id;

#[get("/stats")]
pub async fn stats() -> Result<HttpResponse, AppError> {
    let stats = AdminService::instance().stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

#[get("/users")]
pub async fn list_users(
    filter: web::Query<UserFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = UserService::instance().list_users(filter.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[put("/users/{id}/role")]
pub async fn update_user_role(
    admin: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let user = UserService::instance()
        .update_role(admin.user_id, id, payload.role)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "تم تحديث دور المستخدم")))
}

#[put("/users/{id}/status")]
pub async fn update_user_status(
    admin: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let user = UserService::instance()
        .update_status(admin.user_id, id, payload.is_active)
        .await?;
    let message = if user.is_active { "تم تفعيل الحساب" } else { "تم تعطيل الحساب" };
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, message)))
}

#[get("/achievements")]
pub async fn list_achievements() -> Result<HttpResponse, AppError> {
    let achievements = AchievementService::instance().list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(achievements)))
}

#[post("/achievements")]
pub async fn create_achievement(payload: web::Json<CreateAchievementRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let achievement = AchievementService::instance().create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(achievement, "تم إنشاء الإنجاز بنجاح")))
}

#[put("/achievements/{id}")]
pub async fn update_achievement(
    id: web::Path<String>,
    payload: web::Json<UpdateAchievementRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let achievement = AchievementService::instance().update(id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(achievement, "تم تحديث الإنجاز بنجاح")))
}

#[delete("/achievements/{id}")]
pub async fn delete_achievement(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    AchievementService::instance().delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف الإنجاز بنجاح")))
}

#[get("/content")]
pub async fn list_content(
    filter: web::Query<ContentFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = ContentService::instance().list(filter.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[post("/content")]
pub async fn create_content(
    admin: AuthenticatedUser,
    payload: web::Json<CreateContentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let content = ContentService::instance()
        .create(admin.user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(content, "تم إنشاء المحتوى بنجاح")))
}

#[put("/content/{id}")]
pub async fn update_content(
    admin: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateContentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let content = ContentService::instance()
        .update(admin.user_id, id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(content, "تم تحديث المحتوى بنجاح")))
}

#[delete("/content/{id}")]
pub async fn delete_content(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    ContentService::instance().delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف المحتوى بنجاح")))
}
