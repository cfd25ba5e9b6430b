pub mod config;
pub mod errors;
pub mod navigation;
pub mod registry;
