// Location store: the persistence seam for buddy positions and availability
//
// This is an infrastructure trait only - no matching logic. The engine and
// ledger decide; the store just holds state and answers the four query
// shapes the core is allowed to depend on.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::common::Coordinate;
use crate::domains::matching::models::AvailableBuddy;

pub use memory::InMemoryLocationStore;
pub use postgres::PgLocationStore;

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Replace the authoritative record for a buddy.
    ///
    /// Same-buddy updates apply in `recorded_at` order (last writer by
    /// timestamp, not by arrival): a report older than the stored record
    /// is dropped, which tolerates out-of-order delivery.
    async fn upsert(
        &self,
        buddy_id: &str,
        name: &str,
        coordinate: Coordinate,
        available: bool,
        recorded_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Every buddy whose latest record is available and at most
    /// `freshness_window` old. Order unspecified; callers re-sort.
    async fn query_available(&self, freshness_window: Duration) -> Result<Vec<AvailableBuddy>>;

    /// Atomically mark a buddy unavailable if it is currently available.
    ///
    /// Returns whether the reservation succeeded. Linearizable per buddy
    /// id: of two concurrent calls for the same buddy, exactly one wins.
    /// This is the sole guard against double-assignment.
    async fn reserve(&self, buddy_id: &str) -> Result<bool>;

    /// Mark a buddy available again. Idempotent; unknown ids are a no-op.
    async fn release(&self, buddy_id: &str) -> Result<()>;
}
