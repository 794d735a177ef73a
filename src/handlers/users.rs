//! `/api/users` - own profile, password change and public profiles.

use actix_web::{get, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::request::{ChangePasswordRequest, UpdateProfileRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;
use crate::services::users::user_service::UserService;
use crate::utils::string_utils::parse_object_id;

#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = UserService::instance().get_me(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

#[put("/me", wrap = "AuthMiddleware::required()")]
pub async fn update_me(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let profile = UserService::instance()
        .update_profile(user.user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "تم تحديث الملف الشخصي")))
}

#[put("/me/password", wrap = "AuthMiddleware::required()")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    UserService::instance()
        .change_password(user.user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم تغيير كلمة المرور بنجاح")))
}

#[get("/{id}")]
pub async fn get_public_profile(id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&id)?;

    let profile = UserService::instance().get_public_profile(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_public_profile_with_malformed_id_is_400() {
        let app = test::init_service(App::new().service(get_public_profile)).await;

        let req = test::TestRequest::get().uri("/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "معرف غير صالح");
    }
}
