//! Request middlewares.

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
