pub mod adapter;
pub mod error;
pub mod executor;
pub mod memory;
pub mod sql;
