pub mod data;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use engine::MatchEngine;
pub use error::MatchingError;
pub use ledger::RequestLedger;
pub use service::{MatchOutcome, MatchingService};
