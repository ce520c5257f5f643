use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Coordinate;
use crate::domains::matching::models::{BuddyResponse, RequestStatus};
use crate::domains::matching::{MatchOutcome, MatchingError};
use crate::server::app::AppState;

use super::bad_request;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHelpBody {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedBuddy {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHelpResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buddy: Option<MatchedBuddy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Create a help request: reserve the closest available buddy
///
/// "Nobody in range" is a 200 with `matched: false`, not an error.
pub async fn request_help_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<RequestHelpBody>,
) -> Result<Json<RequestHelpResponse>, Response> {
    let requester = Coordinate::new(body.lat, body.lng);
    if !requester.is_valid() {
        return Err(bad_request("lat/lng out of range"));
    }

    let radius_km = body.radius_km.unwrap_or(state.default_radius_km);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(bad_request("radiusKm must be positive"));
    }

    let outcome = state
        .service
        .create_request(requester, radius_km)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(match outcome {
        MatchOutcome::Matched { request_id, buddy } => RequestHelpResponse {
            matched: true,
            request_id: Some(request_id),
            buddy: Some(MatchedBuddy {
                id: buddy.buddy_id,
                name: buddy.name,
                lat: buddy.coordinate.latitude,
                lng: buddy.coordinate.longitude,
                distance_km: buddy.distance_km,
            }),
            message: None,
        },
        MatchOutcome::NoCandidate => RequestHelpResponse {
            matched: false,
            request_id: None,
            buddy: None,
            message: Some("No buddy available nearby".to_string()),
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyResponseBody {
    pub request_id: Uuid,
    pub buddy_id: String,
    pub response: BuddyResponse,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: RequestStatus,
}

/// A buddy accepts or declines a pending request
pub async fn buddy_response_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<BuddyResponseBody>,
) -> Result<Json<StatusResponse>, MatchingError> {
    let status = state
        .service
        .respond(body.request_id, &body.buddy_id, body.response)
        .await?;

    Ok(Json(StatusResponse { status }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequestBody {
    pub request_id: Uuid,
}

/// Complete an accepted request, returning its buddy to the pool
pub async fn complete_request_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CompleteRequestBody>,
) -> Result<Json<StatusResponse>, MatchingError> {
    let status = state.service.complete(body.request_id).await?;

    Ok(Json(StatusResponse { status }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusResponse {
    pub status: RequestStatus,
    pub buddy_id: String,
}

/// Status poll; clients stop polling once a terminal status comes back
pub async fn request_status_handler(
    Extension(state): Extension<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestStatusResponse>, MatchingError> {
    let (status, buddy_id) = state.service.status_of(request_id).await?;

    Ok(Json(RequestStatusResponse { status, buddy_id }))
}
