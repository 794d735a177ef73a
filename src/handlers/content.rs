//! `/api/content` - public read access to published CMS blocks.

use actix_web::{get, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::services::content::content_service::ContentService;

#[get("/page/{page}")]
pub async fn get_page(page: web::Path<String>) -> Result<HttpResponse, AppError> {
    let blocks = ContentService::instance().get_page(&page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blocks)))
}

#[get("/{key}")]
pub async fn get_by_key(key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let content = ContentService::instance().get_by_key(&key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(content)))
}
