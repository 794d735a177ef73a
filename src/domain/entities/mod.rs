//! Persistent documents, one module per collection.
//!
//! Business rules that depend only on a document's own state (enrollment
//! checks, status transitions, streaks, achievement evaluation, rating
//! snapshots) are implemented as methods here and unit-tested without a
//! database.

pub mod achievement;
pub mod application;
pub mod comment;
pub mod content;
pub mod event;
pub mod opportunity;
pub mod post;
pub mod program;
pub mod reactions;
pub mod review;
pub mod user;
pub mod user_progress;

pub use achievement::*;
pub use application::*;
pub use comment::*;
pub use content::*;
pub use event::*;
pub use opportunity::*;
pub use post::*;
pub use program::*;
pub use reactions::*;
pub use review::*;
pub use user::*;
pub use user_progress::*;
