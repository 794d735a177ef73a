//! # `/api/applications`
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | POST | `/` | authenticated |
//! | GET | `/me` | authenticated |
//! | GET | `/opportunity/{id}` | organization owner, admin |
//! | GET | `/{id}` | applicant, opportunity owner, admin |
//! | PUT | `/{id}/status` | organization owner, admin |
//! | PUT | `/{id}/withdraw` | applicant, while pending |
//!
//! Status changes follow `pending → reviewing → accepted | rejected`;
//! final states accept no further change.

use actix_web::{get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::applications::request::{
    ApplicationFilter, CreateApplicationRequest, UpdateApplicationStatusRequest,
};
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::ORGANIZATION_ROLES;
use crate::middlewares::AuthMiddleware;
use crate::services::opportunities::application_service::ApplicationService;
use crate::utils::string_utils::parse_object_id;

#[post("", wrap = "AuthMiddleware::required()")]
pub async fn apply(
    user: AuthenticatedUser,
    payload: web::Json<CreateApplicationRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let application = ApplicationService::instance()
        .apply(user.user_id, None, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(application, "تم إرسال طلبك بنجاح")))
}

#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn my_applications(
    user: AuthenticatedUser,
    filter: web::Query<ApplicationFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = ApplicationService::instance()
        .list_mine(user.user_id, filter.into_inner(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[get("/opportunity/{id}", wrap = "AuthMiddleware::required_with_roles(ORGANIZATION_ROLES.to_vec())")]
pub async fn for_opportunity(
    user: AuthenticatedUser,
    id: web::Path<String>,
    filter: web::Query<ApplicationFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let page = ApplicationService::instance()
        .list_for_opportunity(&user, id, filter.into_inner(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[get("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn get_application(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let application = ApplicationService::instance().get(&user, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(application)))
}

#[put("/{id}/status", wrap = "AuthMiddleware::required_with_roles(ORGANIZATION_ROLES.to_vec())")]
pub async fn update_status(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateApplicationStatusRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let application = ApplicationService::instance()
        .update_status(&user, id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(application, "تم تحديث حالة الطلب")))
}

#[put("/{id}/withdraw", wrap = "AuthMiddleware::required()")]
pub async fn withdraw(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let application = ApplicationService::instance().withdraw(&user, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(application, "تم سحب الطلب")))
}
