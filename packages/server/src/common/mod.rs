// Common types and utilities shared across the application

pub mod geo;
pub mod types;

pub use types::*;
