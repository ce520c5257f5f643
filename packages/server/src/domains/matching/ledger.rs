// Request lifecycle ledger
//
// Owns every HelpRequest and the availability side effects of its
// transitions. The map lock is never held across a store call: a
// transition commits the status change, drops the lock, then releases the
// buddy, rolling the status back if the release fails so state never
// half-applies.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::common::Coordinate;
use crate::domains::matching::data::LocationStore;
use crate::domains::matching::error::MatchingError;
use crate::domains::matching::models::{
    AssignedBuddy, BuddyResponse, HelpRequest, RequestStatus,
};

pub struct RequestLedger {
    store: Arc<dyn LocationStore>,
    requests: Mutex<HashMap<Uuid, HelpRequest>>,
}

impl RequestLedger {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self {
            store,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Record a new pending request for an already-reserved buddy.
    ///
    /// Request ids are UUIDv7, so they sort by creation time.
    pub async fn create(&self, requester: Coordinate, assigned: &AssignedBuddy) -> Uuid {
        let request = HelpRequest {
            id: Uuid::now_v7(),
            requester,
            buddy_id: assigned.buddy_id.clone(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        let id = request.id;
        self.requests.lock().await.insert(id, request);

        info!(request_id = %id, buddy_id = %assigned.buddy_id, "Created help request");
        id
    }

    /// Apply a buddy's accept/decline response to a pending request.
    ///
    /// `NotFound` unless a request exists with this id and this assigned
    /// buddy. A request that already left Pending is `InvalidTransition`:
    /// a decline's release must never double-apply.
    pub async fn transition(
        &self,
        request_id: Uuid,
        buddy_id: &str,
        response: BuddyResponse,
    ) -> Result<RequestStatus, MatchingError> {
        let to = match response {
            BuddyResponse::Accepted => RequestStatus::Accepted,
            BuddyResponse::Declined => RequestStatus::Declined,
        };

        let from = {
            let mut requests = self.requests.lock().await;
            let request = requests
                .get_mut(&request_id)
                .filter(|request| request.buddy_id == buddy_id)
                .ok_or(MatchingError::NotFound)?;

            if !request.status.can_respond() {
                return Err(MatchingError::InvalidTransition {
                    from: request.status,
                    to,
                });
            }

            let from = request.status;
            request.status = to;
            from
        };

        if to == RequestStatus::Declined {
            // The buddy goes back into the pool. Roll the status back if
            // the store call fails so the decline is not half-applied.
            if let Err(err) = self.store.release(buddy_id).await {
                self.revert_status(request_id, from).await;
                return Err(MatchingError::Store(err));
            }
        }

        info!(request_id = %request_id, status = to.as_str(), "Request transitioned");
        Ok(to)
    }

    /// Mark an accepted request completed and release its buddy.
    ///
    /// Completion requires the request to have been accepted first;
    /// completing from Pending or a terminal status is rejected.
    pub async fn complete(&self, request_id: Uuid) -> Result<RequestStatus, MatchingError> {
        let (from, buddy_id) = {
            let mut requests = self.requests.lock().await;
            let request = requests
                .get_mut(&request_id)
                .ok_or(MatchingError::NotFound)?;

            if !request.status.can_complete() {
                return Err(MatchingError::InvalidTransition {
                    from: request.status,
                    to: RequestStatus::Completed,
                });
            }

            let from = request.status;
            request.status = RequestStatus::Completed;
            (from, request.buddy_id.clone())
        };

        if let Err(err) = self.store.release(&buddy_id).await {
            self.revert_status(request_id, from).await;
            return Err(MatchingError::Store(err));
        }

        info!(request_id = %request_id, buddy_id = %buddy_id, "Request completed");
        Ok(RequestStatus::Completed)
    }

    /// Current status and assigned buddy of a request.
    ///
    /// The buddy id is reported even after decline or completion.
    pub async fn status_of(
        &self,
        request_id: Uuid,
    ) -> Result<(RequestStatus, String), MatchingError> {
        let requests = self.requests.lock().await;
        requests
            .get(&request_id)
            .map(|request| (request.status, request.buddy_id.clone()))
            .ok_or(MatchingError::NotFound)
    }

    async fn revert_status(&self, request_id: Uuid, status: RequestStatus) {
        if let Some(request) = self.requests.lock().await.get_mut(&request_id) {
            request.status = status;
        }
    }
}
