pub mod comment_repo;
pub mod event_repo;
pub mod post_repo;
