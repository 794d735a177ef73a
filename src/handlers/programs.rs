//! # `/api/programs`
//!
//! `{key}` is either the ObjectId or the slug. Writes are limited to the
//! owning instructor and admins; enrollment is open to any signed-in user
//! while the program is published and has room.

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::programs::request::{CreateProgramRequest, ProgramFilter, UpdateProgramRequest};
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::handlers::INSTRUCTOR_ROLES;
use crate::middlewares::AuthMiddleware;
use crate::services::programs::program_service::ProgramService;

/// Admins also see inactive programs
#[get("", wrap = "AuthMiddleware::optional()")]
pub async fn list_programs(
    viewer: OptionalUser,
    filter: web::Query<ProgramFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = ProgramService::instance()
        .list(filter.into_inner(), &query, viewer.is_admin())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

/// `{key}` is an id or a slug
#[get("/{key}")]
pub async fn get_program(key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let program = ProgramService::instance().get(&key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(program)))
}

#[post("", wrap = "AuthMiddleware::required_with_roles(INSTRUCTOR_ROLES.to_vec())")]
pub async fn create_program(
    user: AuthenticatedUser,
    payload: web::Json<CreateProgramRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let program = ProgramService::instance().create(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(program, "تم إنشاء البرنامج بنجاح")))
}

#[put("/{key}", wrap = "AuthMiddleware::required_with_roles(INSTRUCTOR_ROLES.to_vec())")]
pub async fn update_program(
    user: AuthenticatedUser,
    key: web::Path<String>,
    payload: web::Json<UpdateProgramRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let program = ProgramService::instance()
        .update(&user, &key, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(program, "تم تحديث البرنامج بنجاح")))
}

#[delete("/{key}", wrap = "AuthMiddleware::required_with_roles(INSTRUCTOR_ROLES.to_vec())")]
pub async fn delete_program(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    ProgramService::instance().delete(&user, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف البرنامج بنجاح")))
}

#[post("/{key}/enroll", wrap = "AuthMiddleware::required()")]
pub async fn enroll(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let progress = ProgramService::instance().enroll(user.user_id, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(progress, "تم التسجيل في البرنامج بنجاح")))
}

#[get("/{key}/participants", wrap = "AuthMiddleware::required_with_roles(INSTRUCTOR_ROLES.to_vec())")]
pub async fn participants(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let participants = ProgramService::instance().participants(&user, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(participants)))
}
