// HTTP routes
pub mod health;
pub mod locations;
pub mod requests;

pub use health::*;
pub use locations::*;
pub use requests::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::matching::MatchingError;

impl IntoResponse for MatchingError {
    fn into_response(self) -> Response {
        let status = match &self {
            MatchingError::NotFound => StatusCode::NOT_FOUND,
            MatchingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            MatchingError::Store(err) => {
                tracing::error!(error = %err, "Store failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 400 for a structurally valid body carrying out-of-range values
pub(crate) fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
