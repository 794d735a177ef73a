//! `/api/events`

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::events::request::{CreateEventRequest, EventFilter, UpdateEventRequest};
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::handlers::STAFF_ROLES;
use crate::middlewares::AuthMiddleware;
use crate::services::community::event_service::EventService;
use crate::utils::string_utils::parse_object_id;

#[get("", wrap = "AuthMiddleware::optional()")]
pub async fn list_events(
    viewer: OptionalUser,
    filter: web::Query<EventFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = EventService::instance()
        .list(filter.into_inner(), &query, viewer.is_admin())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[get("/{id}", wrap = "AuthMiddleware::optional()")]
pub async fn get_event(viewer: OptionalUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let event = EventService::instance().get(viewer.0.as_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(event)))
}

#[post("", wrap = "AuthMiddleware::required_with_roles(STAFF_ROLES.to_vec())")]
pub async fn create_event(
    user: AuthenticatedUser,
    payload: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let event = EventService::instance().create(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(event, "تم إنشاء الفعالية بنجاح")))
}

#[put("/{id}", wrap = "AuthMiddleware::required_with_roles(STAFF_ROLES.to_vec())")]
pub async fn update_event(
    user: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let id = parse_object_id(&id)?;

    let event = EventService::instance().update(&user, id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(event, "تم تحديث الفعالية بنجاح")))
}

#[delete("/{id}", wrap = "AuthMiddleware::required_with_roles(STAFF_ROLES.to_vec())")]
pub async fn delete_event(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    EventService::instance().delete(&user, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف الفعالية بنجاح")))
}

#[post("/{id}/register", wrap = "AuthMiddleware::required()")]
pub async fn register(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let event = EventService::instance().register(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(event, "تم التسجيل في الفعالية بنجاح")))
}

#[delete("/{id}/register", wrap = "AuthMiddleware::required()")]
pub async fn unregister(user: AuthenticatedUser, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let event = EventService::instance().unregister(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(event, "تم إلغاء التسجيل في الفعالية")))
}
