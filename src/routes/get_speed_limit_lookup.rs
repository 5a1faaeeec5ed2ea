use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::app_state::AppState;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::SpeedUnit;
use crate::utils::app_error::AppError;
use crate::utils::validated_query::ValidatedQuery;

#[derive(Validate, Deserialize)]
pub struct GetSpeedLimitLookupPayload {
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub lat: String,

    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub lon: String,
}

#[derive(Serialize, Deserialize)]
pub struct GetSpeedLimitLookupResponse {
    pub speed_limit: Option<u32>,
    pub unit: SpeedUnit,
    pub road_name: Option<String>,
    pub active_provider: String,
    pub fallback_active: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Resolve ad-hoc coordinates through the same provider chain without
/// touching the published reading.
pub async fn get_speed_limit_lookup(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<GetSpeedLimitLookupPayload>,
) -> Result<Response, AppError> {
    let latitude = payload
        .lat
        .parse::<f64>()
        .map_err(|_| AppError::bad_request(format!("Invalid latitude '{}'", payload.lat)))?;
    let longitude = payload
        .lon
        .parse::<f64>()
        .map_err(|_| AppError::bad_request(format!("Invalid longitude '{}'", payload.lon)))?;

    let coordinate =
        Coordinate::new(latitude, longitude).map_err(|e| AppError::bad_request(e.to_string()))?;

    let outcome = state.resolver.resolve(&coordinate).await;

    Ok(Json(GetSpeedLimitLookupResponse {
        speed_limit: outcome.reading.speed_limit,
        unit: outcome.reading.unit,
        road_name: outcome.reading.road_name,
        active_provider: outcome.active_provider.display_name().to_string(),
        fallback_active: outcome.fallback_active,
        fetched_at: outcome.reading.fetched_at,
    })
    .into_response())
}
