pub mod application_repo;
pub mod opportunity_repo;
