pub mod adapter;
pub mod params;
pub mod utils;
