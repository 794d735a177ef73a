//! `/api/opportunities`

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::applications::request::CreateApplicationRequest;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::opportunities::request::{
    CreateOpportunityRequest, OpportunityFilter, UpdateOpportunityRequest,
};
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::ORGANIZATION_ROLES;
use crate::middlewares::AuthMiddleware;
use crate::services::opportunities::application_service::ApplicationService;
use crate::services::opportunities::opportunity_service::OpportunityService;
use crate::utils::string_utils::parse_object_id;

#[get("")]
pub async fn list_opportunities(
    filter: web::Query<OpportunityFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = OpportunityService::instance().list(filter.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[get("/{id}")]
pub async fn get_opportunity(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let opportunity = OpportunityService::instance().get(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(opportunity)))
}

#[post("", wrap = "AuthMiddleware::required_with_roles(ORGANIZATION_ROLES.to_vec())")]
pub async fn create_opportunity(
    user: AuthenticatedUser,
    payload: web::Json<CreateOpportunityRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let opportunity = OpportunityService::instance().create(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(opportunity, "تم نشر الفرصة بنجاح")))
}

#[put("/{id}", wrap = "AuthMiddleware::required_with_roles(ORGANIZATION_ROLES.to_vec())")]
pub async fn update_opportunity(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateOpportunityRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let opportunity = OpportunityService::instance()
        .update(&user, id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(opportunity, "تم تحديث الفرصة بنجاح")))
}

#[delete("/{id}", wrap = "AuthMiddleware::required_with_roles(ORGANIZATION_ROLES.to_vec())")]
pub async fn delete_opportunity(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    OpportunityService::instance().delete(&user, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف الفرصة بنجاح")))
}

/// Same as `POST /api/applications` with the opportunity taken from the path
#[post("/{id}/apply", wrap = "AuthMiddleware::required()")]
pub async fn apply(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<CreateApplicationRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let application = ApplicationService::instance()
        .apply(user.user_id, Some(id), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(application, "تم إرسال طلبك بنجاح")))
}
