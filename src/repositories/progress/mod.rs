pub mod achievement_repo;
pub mod user_progress_repo;
