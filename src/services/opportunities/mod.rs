pub mod application_service;
pub mod opportunity_service;
