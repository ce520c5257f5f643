use thiserror::Error;

use crate::domains::matching::models::RequestStatus;

/// Errors surfaced by the matching domain
///
/// Finding no candidate is not an error; see `MatchOutcome::NoCandidate`.
#[derive(Error, Debug)]
pub enum MatchingError {
    #[error("Request not found")]
    NotFound,

    #[error("Invalid transition: cannot move from {} to {}", .from.as_str(), .to.as_str())]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
