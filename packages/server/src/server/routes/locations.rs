use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::common::Coordinate;
use crate::domains::matching::MatchingError;
use crate::server::app::AppState;

use super::bad_request;

#[derive(Debug, Deserialize)]
pub struct BuddyLocationBody {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub available: bool,
}

#[derive(Serialize)]
pub struct BuddyLocationResponse {
    pub success: bool,
}

/// Ingest a buddy's location report
///
/// The wire carries no timestamp, so arrival time is the report time;
/// the store applies same-buddy reports in timestamp order.
pub async fn buddy_location_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<BuddyLocationBody>,
) -> Result<Json<BuddyLocationResponse>, Response> {
    if body.id.trim().is_empty() || body.name.trim().is_empty() {
        return Err(bad_request("id and name are required"));
    }

    let coordinate = Coordinate::new(body.lat, body.lng);
    if !coordinate.is_valid() {
        return Err(bad_request("lat/lng out of range"));
    }

    state
        .store
        .upsert(&body.id, &body.name, coordinate, body.available, Utc::now())
        .await
        .map_err(|err| MatchingError::Store(err).into_response())?;

    Ok(Json(BuddyLocationResponse { success: true }))
}
