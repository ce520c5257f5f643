// In-memory location store
//
// Backs local development and tests. State lives in a mutex-guarded map
// owned by the store instance, not in module-level globals, so every
// service built in a test is isolated. No lock is held across an await:
// none of the critical sections suspend.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::common::Coordinate;
use crate::domains::matching::models::{AvailableBuddy, BuddyRecord};

use super::LocationStore;

#[derive(Default)]
pub struct InMemoryLocationStore {
    records: Mutex<HashMap<String, BuddyRecord>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn upsert(
        &self,
        buddy_id: &str,
        name: &str,
        coordinate: Coordinate,
        available: bool,
        recorded_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut records = self.records.lock().await;
        match records.get_mut(buddy_id) {
            // Out-of-order delivery: the stored record is newer, drop this one.
            Some(existing) if existing.recorded_at > recorded_at => {}
            Some(existing) => {
                existing.name = name.to_string();
                existing.coordinate = coordinate;
                existing.available = available;
                existing.recorded_at = recorded_at;
            }
            None => {
                records.insert(
                    buddy_id.to_string(),
                    BuddyRecord {
                        buddy_id: buddy_id.to_string(),
                        name: name.to_string(),
                        coordinate,
                        available,
                        recorded_at,
                    },
                );
            }
        }
        Ok(())
    }

    async fn query_available(&self, freshness_window: Duration) -> Result<Vec<AvailableBuddy>> {
        let cutoff = Utc::now() - freshness_window;
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|record| record.available && record.recorded_at >= cutoff)
            .map(|record| AvailableBuddy {
                buddy_id: record.buddy_id.clone(),
                name: record.name.clone(),
                coordinate: record.coordinate,
                recorded_at: record.recorded_at,
            })
            .collect())
    }

    async fn reserve(&self, buddy_id: &str) -> Result<bool> {
        let mut records = self.records.lock().await;
        match records.get_mut(buddy_id) {
            Some(record) if record.available => {
                record.available = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, buddy_id: &str) -> Result<()> {
        let mut records = self.records.lock().await;
        if let Some(record) = records.get_mut(buddy_id) {
            record.available = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude)
    }

    const WINDOW: i64 = 300;

    #[tokio::test]
    async fn upsert_then_query_round_trip() {
        let store = InMemoryLocationStore::new();
        store
            .upsert("b1", "Sam", coord(44.98, -93.27), true, Utc::now())
            .await
            .unwrap();

        let available = store
            .query_available(Duration::seconds(WINDOW))
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].buddy_id, "b1");
        assert_eq!(available[0].name, "Sam");
    }

    #[tokio::test]
    async fn stale_records_are_excluded() {
        let store = InMemoryLocationStore::new();
        store
            .upsert(
                "b1",
                "Sam",
                coord(44.98, -93.27),
                true,
                Utc::now() - Duration::seconds(WINDOW + 60),
            )
            .await
            .unwrap();

        let available = store
            .query_available(Duration::seconds(WINDOW))
            .await
            .unwrap();
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn unavailable_records_are_excluded() {
        let store = InMemoryLocationStore::new();
        store
            .upsert("b1", "Sam", coord(44.98, -93.27), false, Utc::now())
            .await
            .unwrap();

        let available = store
            .query_available(Duration::seconds(WINDOW))
            .await
            .unwrap();
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn older_report_does_not_clobber_newer() {
        let store = InMemoryLocationStore::new();
        let now = Utc::now();
        store
            .upsert("b1", "Sam", coord(44.98, -93.27), true, now)
            .await
            .unwrap();
        // A report recorded earlier arrives late.
        store
            .upsert(
                "b1",
                "Sam",
                coord(40.0, -74.0),
                false,
                now - Duration::seconds(30),
            )
            .await
            .unwrap();

        let available = store
            .query_available(Duration::seconds(WINDOW))
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].coordinate, coord(44.98, -93.27));
    }

    #[tokio::test]
    async fn reserve_succeeds_once() {
        let store = InMemoryLocationStore::new();
        store
            .upsert("b1", "Sam", coord(44.98, -93.27), true, Utc::now())
            .await
            .unwrap();

        assert!(store.reserve("b1").await.unwrap());
        assert!(!store.reserve("b1").await.unwrap());
    }

    #[tokio::test]
    async fn reserve_unknown_buddy_fails() {
        let store = InMemoryLocationStore::new();
        assert!(!store.reserve("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn release_restores_availability_and_is_idempotent() {
        let store = InMemoryLocationStore::new();
        store
            .upsert("b1", "Sam", coord(44.98, -93.27), true, Utc::now())
            .await
            .unwrap();
        assert!(store.reserve("b1").await.unwrap());

        store.release("b1").await.unwrap();
        store.release("b1").await.unwrap();

        assert!(store.reserve("b1").await.unwrap());
    }
}
