pub mod program_repo;
pub mod review_repo;
