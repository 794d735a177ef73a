//! Youth Hub backend
//!
//! Bilingual (Arabic/English) REST API for a youth-development nonprofit:
//! training programs, opportunities and applications, events, a blog with
//! comments, program reviews, CMS content blocks and a gamified learner
//! dashboard that tracks progress and unlocks achievements.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/* scopes, AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← validation, path ids, response envelope
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← business rules, ownership checks
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← MongoDB collections, Redis read-through cache
//! └─────────────────┘
//! ```
//!
//! Services and repositories are singletons created by `singleton_macro`
//! and resolved through [`core::registry::ServiceLocator`].
//!
//! ```rust,ignore
//! use youth_hub_backend::services::progress::progress_service::ProgressService;
//!
//! let dashboard = ProgressService::instance().get_dashboard(user_id).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
