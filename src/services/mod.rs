//! # Services
//!
//! Business logic, one `#[service]` singleton per resource. Services receive
//! their repositories through the registry and call each other through
//! `instance()`:
//!
//! ```rust,ignore
//! use crate::services::programs::program_service::ProgramService;
//!
//! let programs = ProgramService::instance();
//! let enrolled = programs.enroll(user_id, "intro-to-python-a1b2c3").await?;
//! ```
//!
//! Role checks happen in the route middleware; ownership checks ("owner or
//! admin") happen here, against the loaded document.

pub mod admin;
pub mod auth;
pub mod community;
pub mod content;
pub mod opportunities;
pub mod programs;
pub mod progress;
pub mod users;
