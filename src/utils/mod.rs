//! Shared helpers.
//!
//! - [`string_utils`] - trimming, slugs, regex escaping
//! - [`datetime`] - BSON ↔ chrono conversions and day arithmetic
//! - [`display_terminal`] - boot-time console output

pub mod datetime;
pub mod display_terminal;
pub mod string_utils;
