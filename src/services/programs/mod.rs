pub mod program_service;
pub mod review_service;
