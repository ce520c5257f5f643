use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Coordinate;

/// Lifecycle status of a help request
///
/// Pending → Accepted or Declined; Accepted → Completed.
/// Declined and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl RequestStatus {
    /// Whether a buddy response (accept/decline) is permitted from here
    pub fn can_respond(self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    /// Whether completion is permitted from here
    ///
    /// Completion requires the request to have been accepted first.
    pub fn can_complete(self) -> bool {
        matches!(self, RequestStatus::Accepted)
    }

    /// No further transitions are permitted from a terminal status
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Declined | RequestStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
            RequestStatus::Completed => "completed",
        }
    }
}

/// A buddy's answer to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuddyResponse {
    Accepted,
    Declined,
}

/// One matching attempt and its outcome
///
/// The buddy association is kept after decline and completion so the
/// history of who was asked stays auditable.
#[derive(Debug, Clone)]
pub struct HelpRequest {
    pub id: Uuid,
    pub requester: Coordinate,
    pub buddy_id: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}
