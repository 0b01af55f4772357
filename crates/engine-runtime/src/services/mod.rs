pub mod error;
pub mod game_version;
pub mod mapping_type;
pub mod release;
