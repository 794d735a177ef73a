//! # Core
//!
//! Cross-cutting building blocks every layer depends on.
//!
//! - [`registry`] - the `ServiceLocator` that backs the `#[service]` and
//!   `#[repository]` singleton macros. Repositories and services are
//!   collected at compile time through `inventory` and created lazily on
//!   first `instance()` call; infrastructure (`Database`, `RedisClient`) is
//!   registered by hand in `main`.
//! - [`errors`] - [`AppError`], the single error type returned by services
//!   and handlers and rendered as `{success: false, message, error}`.
//!
//! ```rust,ignore
//! use youth_hub_backend::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis_client);
//! ServiceLocator::initialize_all().await?;
//!
//! let programs = ProgramService::instance();
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
