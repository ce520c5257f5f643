// Nearest-buddy selection and reservation

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tracing::debug;

use crate::common::geo;
use crate::common::Coordinate;
use crate::domains::matching::data::LocationStore;
use crate::domains::matching::models::{AssignedBuddy, AvailableBuddy};

/// Selects and reserves the closest available buddy for a request
pub struct MatchEngine {
    store: Arc<dyn LocationStore>,
    freshness_window: Duration,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn LocationStore>, freshness_window: Duration) -> Self {
        Self {
            store,
            freshness_window,
        }
    }

    /// Pick the closest fresh candidate within `radius_km` and reserve it.
    ///
    /// Ties on distance break by ascending buddy id, so selection is
    /// deterministic regardless of store iteration order. A reservation
    /// lost to a concurrent request falls through to the next candidate;
    /// `None` means no eligible buddy remained.
    pub async fn select_and_reserve(
        &self,
        requester: Coordinate,
        radius_km: f64,
    ) -> Result<Option<AssignedBuddy>> {
        let available = self.store.query_available(self.freshness_window).await?;

        let mut candidates: Vec<(f64, AvailableBuddy)> = available
            .into_iter()
            .map(|buddy| (geo::distance_km(requester, buddy.coordinate), buddy))
            .filter(|(distance, _)| *distance <= radius_km)
            .collect();

        candidates.sort_by(|(da, a), (db, b)| {
            da.total_cmp(db).then_with(|| a.buddy_id.cmp(&b.buddy_id))
        });

        for (distance, buddy) in candidates {
            if self.store.reserve(&buddy.buddy_id).await? {
                debug!(
                    buddy_id = %buddy.buddy_id,
                    distance_km = distance,
                    "Reserved buddy for request"
                );
                return Ok(Some(AssignedBuddy {
                    buddy_id: buddy.buddy_id,
                    name: buddy.name,
                    coordinate: buddy.coordinate,
                    distance_km: distance,
                }));
            }
            debug!(
                buddy_id = %buddy.buddy_id,
                "Reservation lost to concurrent request, trying next candidate"
            );
        }

        Ok(None)
    }
}
