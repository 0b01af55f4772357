pub mod error;
pub mod execution;
pub mod repositories;
pub mod services;
