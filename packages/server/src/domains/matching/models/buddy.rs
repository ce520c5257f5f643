use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::Coordinate;

/// A buddy's last reported position and availability
///
/// At most one record per buddy is authoritative: the one with the latest
/// `recorded_at`. Older reports arriving out of order are dropped on upsert.
#[derive(Debug, Clone)]
pub struct BuddyRecord {
    pub buddy_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub available: bool,
    pub recorded_at: DateTime<Utc>,
}

/// A matching candidate returned by `LocationStore::query_available`
#[derive(Debug, Clone)]
pub struct AvailableBuddy {
    pub buddy_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

/// The buddy chosen and reserved for a help request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedBuddy {
    pub buddy_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}
