pub mod content_repo;
