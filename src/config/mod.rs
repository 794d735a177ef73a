//! # Configuration
//!
//! Environment-driven settings, read through small namespace structs.
//!
//! - [`data_config`] - environment, server, bcrypt, rate limiting, CORS,
//!   pagination and opportunity defaults
//! - [`auth_config`] - JWT
//!
//! Values come from the process environment, seeded by `main` from
//! `.env.dev` / `.env.prod` / `.env` depending on `PROFILE`.
//!
//! ```bash
//! MONGODB_URI=mongodb://localhost:27017
//! DATABASE_NAME=youth_hub_dev
//! REDIS_URL=redis://localhost:6379
//! JWT_SECRET=change-me
//! CLIENT_URL=http://localhost:3000
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
