//! Request-scoped identity placed in the request extensions by
//! `AuthMiddleware` and pulled out by handlers as an extractor.

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::user::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Ownership rule shared by every resource: the owner or an admin
    pub fn can_manage(&self, owner: &ObjectId) -> bool {
        self.is_admin() || self.user_id == *owner
    }

    pub fn ensure_can_manage(&self, owner: &ObjectId) -> Result<(), AppError> {
        if self.can_manage(owner) {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }
}

/// Fails with a JSON 401 when the middleware attached no user
impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "يجب تسجيل الدخول للوصول إلى هذا المورد".to_string(),
            ))),
        }
    }
}

/// Never fails; `None` for anonymous requests on optional-auth routes
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl OptionalUser {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|u| u.is_admin())
    }
}

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser { user_id: ObjectId::new(), role }
    }

    #[test]
    fn test_can_manage() {
        let owner = user(UserRole::Instructor);
        let other = user(UserRole::User);
        let admin = user(UserRole::Admin);

        assert!(owner.can_manage(&owner.user_id));
        assert!(!other.can_manage(&owner.user_id));
        assert!(admin.can_manage(&owner.user_id));
        assert!(matches!(other.ensure_can_manage(&owner.user_id), Err(AppError::AuthorizationError(_))));
    }

    #[actix_web::test]
    async fn test_extractor_without_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = AuthenticatedUser::extract(&req).await;
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));

        let optional = OptionalUser::extract(&req).await.unwrap();
        assert!(optional.0.is_none());
    }

    #[actix_web::test]
    async fn test_extractor_with_user() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user(UserRole::Admin));

        let extracted = AuthenticatedUser::extract(&req).await.unwrap();
        assert!(extracted.is_admin());
        assert!(OptionalUser::extract(&req).await.unwrap().is_admin());
    }
}
