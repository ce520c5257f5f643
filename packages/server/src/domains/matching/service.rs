// Matching service facade
//
// The boundary layer talks to this and nothing below it: one call to
// create a request (match + reserve + record as a unit), and pass-throughs
// for the lifecycle operations.

use tracing::info;
use uuid::Uuid;

use crate::common::Coordinate;
use crate::domains::matching::engine::MatchEngine;
use crate::domains::matching::error::MatchingError;
use crate::domains::matching::ledger::RequestLedger;
use crate::domains::matching::models::{AssignedBuddy, BuddyResponse, RequestStatus};

/// Result of a create-request call
///
/// Finding nobody is an expected outcome, not an error.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matched {
        request_id: Uuid,
        buddy: AssignedBuddy,
    },
    NoCandidate,
}

pub struct MatchingService {
    engine: MatchEngine,
    ledger: RequestLedger,
}

impl MatchingService {
    pub fn new(engine: MatchEngine, ledger: RequestLedger) -> Self {
        Self { engine, ledger }
    }

    /// Match a help request to the closest available buddy.
    ///
    /// On a match the buddy is already reserved and the request recorded
    /// as pending; recording cannot fail, so a returned `Matched` never
    /// leaves a dangling reservation.
    pub async fn create_request(
        &self,
        requester: Coordinate,
        radius_km: f64,
    ) -> Result<MatchOutcome, MatchingError> {
        match self.engine.select_and_reserve(requester, radius_km).await? {
            Some(buddy) => {
                let request_id = self.ledger.create(requester, &buddy).await;
                info!(
                    request_id = %request_id,
                    buddy_id = %buddy.buddy_id,
                    distance_km = buddy.distance_km,
                    "Matched help request"
                );
                Ok(MatchOutcome::Matched { request_id, buddy })
            }
            None => {
                info!("No eligible buddy for help request");
                Ok(MatchOutcome::NoCandidate)
            }
        }
    }

    /// Apply a buddy's accept/decline response.
    pub async fn respond(
        &self,
        request_id: Uuid,
        buddy_id: &str,
        response: BuddyResponse,
    ) -> Result<RequestStatus, MatchingError> {
        self.ledger.transition(request_id, buddy_id, response).await
    }

    /// Complete an accepted request.
    pub async fn complete(&self, request_id: Uuid) -> Result<RequestStatus, MatchingError> {
        self.ledger.complete(request_id).await
    }

    /// Status poll for a request.
    pub async fn status_of(
        &self,
        request_id: Uuid,
    ) -> Result<(RequestStatus, String), MatchingError> {
        self.ledger.status_of(request_id).await
    }
}
