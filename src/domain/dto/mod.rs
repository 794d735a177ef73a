//! Request / response shapes of the REST API.
//!
//! Requests are validated with `validator` derives; responses flatten BSON
//! types into hex ids and RFC 3339 timestamps and use camelCase field names.

pub mod admin;
pub mod applications;
pub mod common;
pub mod content;
pub mod dashboard;
pub mod events;
pub mod opportunities;
pub mod posts;
pub mod programs;
pub mod reviews;
pub mod users;

pub use common::*;
