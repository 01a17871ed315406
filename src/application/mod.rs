pub mod coverage_service;
pub mod trajectory_service;

pub use coverage_service::*;
pub use trajectory_service::*;
