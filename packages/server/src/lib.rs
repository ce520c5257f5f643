// Buddy Walk - API Core
//
// This crate provides the backend for matching requesters with nearby
// available walking buddies. Pure matching logic lives in domains/matching;
// the HTTP boundary in server/ is a thin translation layer over it.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
