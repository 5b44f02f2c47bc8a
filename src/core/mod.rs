pub mod config;
pub mod constants;
pub mod coordinator;
pub mod definition;
pub mod geo;
pub mod geometry;
pub mod map;
pub mod registry;
pub mod viewport;
