pub mod achievement_service;
pub mod progress_service;
