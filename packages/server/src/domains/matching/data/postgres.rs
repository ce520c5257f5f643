// PostgreSQL-backed location store
//
// Schema: one `buddies` row per buddy (name + the availability flag that
// reservation flips) and an append-only `buddy_locations` table holding
// every report. Matching reads the freshest location row per buddy, so
// last-writer-by-timestamp falls out of the ordering rather than needing
// in-place updates.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::common::Coordinate;
use crate::domains::matching::models::AvailableBuddy;

use super::LocationStore;

pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AvailableBuddyRow {
    buddy_id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    recorded_at: DateTime<Utc>,
}

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn upsert(
        &self,
        buddy_id: &str,
        name: &str,
        coordinate: Coordinate,
        available: bool,
        recorded_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // The guard keeps availability in timestamp order: a report older
        // than the stored row must not clobber it.
        sqlx::query(
            "INSERT INTO buddies (id, name, available, updated_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET name = EXCLUDED.name,
                 available = EXCLUDED.available,
                 updated_at = EXCLUDED.updated_at
             WHERE buddies.updated_at <= EXCLUDED.updated_at",
        )
        .bind(buddy_id)
        .bind(name)
        .bind(available)
        .bind(recorded_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO buddy_locations (buddy_id, latitude, longitude, recorded_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(buddy_id)
        .bind(coordinate.latitude)
        .bind(coordinate.longitude)
        .bind(recorded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn query_available(&self, freshness_window: Duration) -> Result<Vec<AvailableBuddy>> {
        let cutoff = Utc::now() - freshness_window;

        let rows = sqlx::query_as::<_, AvailableBuddyRow>(
            "SELECT DISTINCT ON (l.buddy_id)
                    l.buddy_id, b.name, l.latitude, l.longitude, l.recorded_at
             FROM buddy_locations l
             JOIN buddies b ON b.id = l.buddy_id
             WHERE b.available = true
               AND l.recorded_at >= $1
             ORDER BY l.buddy_id, l.recorded_at DESC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AvailableBuddy {
                buddy_id: row.buddy_id,
                name: row.name,
                coordinate: Coordinate::new(row.latitude, row.longitude),
                recorded_at: row.recorded_at,
            })
            .collect())
    }

    async fn reserve(&self, buddy_id: &str) -> Result<bool> {
        // The conditional update is the atomicity guarantee: of two
        // concurrent reservations, exactly one sees available = true.
        let result =
            sqlx::query("UPDATE buddies SET available = false WHERE id = $1 AND available = true")
                .bind(buddy_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, buddy_id: &str) -> Result<()> {
        sqlx::query("UPDATE buddies SET available = true WHERE id = $1")
            .bind(buddy_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
