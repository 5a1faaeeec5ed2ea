use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::app_state::AppState;
use crate::utils::app_error::AppError;
use crate::utils::location_extractor::{extract_coordinate, LocationSnapshot};

#[derive(Serialize, Deserialize)]
pub struct PostLocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// Accept a fresh location snapshot in any of the supported reading forms.
/// The snapshot is validated by running the extractor before it is stored,
/// so a malformed reading never replaces a working one.
pub async fn post_location(
    State(state): State<AppState>,
    Json(snapshot): Json<LocationSnapshot>,
) -> Result<Response, AppError> {
    let coordinate =
        extract_coordinate(&snapshot).map_err(|e| AppError::bad_request(e.to_string()))?;

    info!(
        "Location updated to ({}, {})",
        coordinate.latitude, coordinate.longitude
    );

    let mut location = state.location.write().await;
    *location = Some(snapshot);

    Ok(Json(PostLocationResponse {
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
    })
    .into_response())
}
