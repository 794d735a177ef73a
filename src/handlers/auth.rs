//! `/api/auth` - registration, login and the current session.

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::auth_service::AuthService;
use crate::services::users::user_service::UserService;

#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance().register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(response, "تم إنشاء الحساب بنجاح")))
}

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance().login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(response, "تم تسجيل الدخول بنجاح")))
}

#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = UserService::instance().get_me(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_register_rejects_invalid_payload_before_touching_services() {
        let app = test::init_service(App::new().service(register)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({ "name": "S", "email": "not-an-email", "password": "123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "validation_error");
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let app = test::init_service(App::new().service(me)).await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
