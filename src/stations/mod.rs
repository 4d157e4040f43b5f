pub mod directory;
pub mod error;
pub mod resolve_station;
