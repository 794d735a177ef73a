//! # HTTP handlers
//!
//! One module per resource. Handlers stay thin: validate the payload,
//! parse path ids, call the resource service singleton and wrap the result
//! in [`ApiResponse`](crate::domain::dto::ApiResponse).
//!
//! Authentication is declared next to each handler with the `wrap`
//! attribute (`AuthMiddleware::required()`, `optional()` or a role set);
//! scopes that are entirely protected (`/dashboard`, `/admin`) are wrapped
//! once in [`routes`](crate::routes).

use crate::domain::entities::user::UserRole;

pub mod admin;
pub mod applications;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod events;
pub mod opportunities;
pub mod posts;
pub mod programs;
pub mod reviews;
pub mod users;

/// Roles allowed to publish programs
pub const INSTRUCTOR_ROLES: [UserRole; 2] = [UserRole::Instructor, UserRole::Admin];

/// Roles allowed to post opportunities and review their applications
pub const ORGANIZATION_ROLES: [UserRole; 2] = [UserRole::Organization, UserRole::Admin];

/// Roles allowed to organize events and write posts
pub const STAFF_ROLES: [UserRole; 3] = [UserRole::Instructor, UserRole::Organization, UserRole::Admin];
