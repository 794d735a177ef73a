//! Non-persistent models: request identity and JWT claims.

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
