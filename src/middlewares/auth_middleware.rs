//! # Authentication middleware
//!
//! Wraps a scope or resource and resolves the bearer token into an
//! [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)
//! stored in the request extensions.
//!
//! ```rust,ignore
//! web::scope("/admin")
//!     .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
//!
//! web::resource("")
//!     .route(web::post().to(create_program).wrap(
//!         AuthMiddleware::required_with_roles(vec![UserRole::Instructor, UserRole::Admin]),
//!     ))
//! ```
//!
//! In `Required` mode a missing/invalid token, an unknown or deactivated
//! user answers 401 and a role mismatch answers 403, both with the regular
//! JSON error body. In `Optional` mode the request always proceeds.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::user::UserRole;
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    pub fn required_with_role(role: UserRole) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }

    pub fn required_with_roles(roles: Vec<UserRole>) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(roles))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_required_without_header_is_401_json() {
        let app = test::init_service(
            App::new().service(
                web::resource("/private")
                    .wrap(AuthMiddleware::required())
                    .to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/private").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "authentication_error");
    }

    #[actix_web::test]
    async fn test_optional_without_header_passes() {
        let app = test::init_service(
            App::new().service(
                web::resource("/public")
                    .wrap(AuthMiddleware::optional())
                    .to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/public").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_required_with_malformed_header_is_401() {
        let app = test::init_service(
            App::new().service(
                web::resource("/private")
                    .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
                    .to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header(("Authorization", "Token abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
