//! # Application Error Model
//!
//! Every failure a request can hit is funnelled into [`AppError`], which
//! implements [`actix_web::ResponseError`]. Handlers and services simply
//! return `AppResult<T>` and use `?`; the conversion to an HTTP status and the
//! uniform JSON body happens in exactly one place.
//!
//! ## Response body
//!
//! ```json
//! { "success": false, "message": "المورد غير موجود", "error": "not_found" }
//! ```
//!
//! `message` is the Arabic user-facing text shown by the client, `error` is a
//! stable machine-readable code.
//!
//! ## Status mapping
//!
//! | Variant | Status | Typical source |
//! |---------|--------|----------------|
//! | `ValidationError` | 400 | validator DTOs, malformed ObjectId, business rule |
//! | `DuplicateError` | 400 | MongoDB duplicate key (E11000) |
//! | `AuthenticationError` | 401 | missing / invalid / expired JWT |
//! | `AuthorizationError` | 403 | role or ownership check |
//! | `NotFound` | 404 | unknown document |
//! | `DatabaseError`, `InternalError` | 500 | infrastructure |

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// MongoDB server error code for unique index violations
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database driver failure (500)
    #[error("{0}")]
    DatabaseError(String),

    /// Input or business-rule violation (400)
    #[error("{0}")]
    ValidationError(String),

    /// Unique constraint violation (400)
    #[error("{0}")]
    DuplicateError(String),

    /// Missing document (404)
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credentials (401)
    #[error("{0}")]
    AuthenticationError(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    AuthorizationError(String),

    /// Anything else (500)
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// Stable code placed in the `error` field of the response body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::DuplicateError(_) => "duplicate_error",
            AppError::NotFound(_) => "not_found",
            AppError::AuthenticationError(_) => "authentication_error",
            AppError::AuthorizationError(_) => "authorization_error",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// Shorthand for the common "invalid id" case
    pub fn invalid_id() -> Self {
        AppError::ValidationError("معرف غير صالح".to_string())
    }

    /// Shorthand for ownership failures
    pub fn forbidden() -> Self {
        AppError::AuthorizationError("غير مصرح لك بتنفيذ هذا الإجراء".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::DuplicateError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Infrastructure details stay in the log, not in the response
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}: {}", self.code(), self);
            "حدث خطأ في الخادم".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "message": message,
            "error": self.code(),
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return AppError::DuplicateError("هذه البيانات موجودة مسبقاً".to_string());
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(first_validation_message(&errors))
    }
}

/// Picks the first human readable message out of a validator error tree
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "البيانات المدخلة غير صالحة".to_string())
}

/// Returns true when the driver error is an E11000 unique index violation
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

/// Wraps foreign errors into `AppError::InternalError` with context
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[test]
    fn test_validation_and_duplicate_are_bad_request() {
        let validation = AppError::ValidationError("أنت مسجل بالفعل".to_string());
        let duplicate = AppError::DuplicateError("duplicate".to_string());

        assert_eq!(validation.error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_errors_status() {
        assert_eq!(
            AppError::AuthenticationError("token".to_string()).error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden().error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_and_internal_status() {
        assert_eq!(
            AppError::NotFound("missing".to_string()).error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError("boom".to_string()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = AppError::ValidationError("أنت مسجل بالفعل".to_string()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "أنت مسجل بالفعل");
        assert_eq!(json["error"], "validation_error");
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::DatabaseError("connection refused 10.0.0.3".to_string()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "حدث خطأ في الخادم");
        assert_eq!(json["error"], "database_error");
    }

    fn write_error(code: i32, message: &str) -> mongodb::error::Error {
        let write_error: mongodb::error::WriteError = mongodb::bson::from_document(mongodb::bson::doc! {
            "code": code,
            "errmsg": message,
            "message": message,
        })
        .unwrap();
        mongodb::error::Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn test_duplicate_key_write_error_maps_to_duplicate() {
        let err = write_error(
            11000,
            "E11000 duplicate key error collection: youth_hub.applications index: applicant_opportunity_unique",
        );
        assert!(is_duplicate_key(&err));

        let app_err = AppError::from(err);
        assert!(matches!(app_err, AppError::DuplicateError(_)));
        assert_eq!(app_err.error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(app_err.code(), "duplicate_error");
    }

    #[test]
    fn test_other_write_error_stays_database_error() {
        let err = write_error(121, "Document failed validation");
        assert!(!is_duplicate_key(&err));

        let app_err = AppError::from(err);
        assert!(matches!(app_err, AppError::DatabaseError(_)));
        assert_eq!(app_err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validator_errors_use_field_message() {
        #[derive(Validate)]
        struct Sample {
            #[validate(length(min = 3, message = "الاسم قصير جداً"))]
            name: String,
        }

        let err: AppError = Sample { name: "a".to_string() }.validate().unwrap_err().into();
        match err {
            AppError::ValidationError(msg) => assert_eq!(msg, "الاسم قصير جداً"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
