use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::AppError;
use crate::domain::models::auth::{AuthMode, AuthenticatedUser, RequiredRole};
use crate::repositories::users::user_repo::UserRepository;
use crate::services::auth::token_service::TokenService;
use crate::utils::string_utils::parse_object_id;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let has_header = req.headers().contains_key("Authorization");

            match (&mode, authenticate(&req).await) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("authentication failed for {}: {}", req.path(), err);
                    return Ok(reject(req, err));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(user.role) {
                            log::warn!(
                                "user {} ({}) denied on {}: requires {:?}",
                                user.user_id.to_hex(),
                                user.role.as_str(),
                                req.path(),
                                required
                            );
                            return Ok(reject(req, AppError::forbidden()));
                        }
                    }
                    log::debug!("authenticated user {}", user.user_id.to_hex());
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    if required_role.as_ref().is_none_or(|r| r.is_satisfied(user.role)) {
                        req.extensions_mut().insert(user);
                    }
                }
                (AuthMode::Optional, Err(err)) => {
                    if has_header {
                        log::debug!("ignoring invalid token on optional route: {}", err);
                    }
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = err.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// Token → claims → current user document. The role is taken from the
/// stored user so role changes and deactivation apply immediately.
async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("يجب تسجيل الدخول للوصول إلى هذا المورد".to_string()))?;

    let token_service = TokenService::instance();
    let token = token_service.extract_bearer_token(auth_header)?;
    let claims = token_service.verify_token(token)?;

    let user_id = parse_object_id(&claims.user_id)
        .map_err(|_| AppError::AuthenticationError("رمز المصادقة غير صالح".to_string()))?;

    let user = UserRepository::instance()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("المستخدم غير موجود".to_string()))?;

    if !user.is_active {
        return Err(AppError::AuthenticationError("تم تعطيل هذا الحساب".to_string()));
    }

    Ok(AuthenticatedUser {
        user_id,
        role: user.role,
    })
}
