//! # Domain layer
//!
//! ```text
//! domain
//! ├── entities  - MongoDB documents and their business rules
//! ├── dto       - validated requests and serialized responses
//! └── models    - request identity (AuthenticatedUser) and JWT claims
//! ```
//!
//! Entities never leave the process as-is: handlers convert them into
//! response DTOs so that ObjectIds and BSON dates are rendered as strings.

pub mod dto;
pub mod entities;
pub mod models;
