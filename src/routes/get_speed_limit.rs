use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::app_state::{AppState, LatestReading};
use crate::types::speed_limit::SpeedUnit;
use crate::utils::app_error::AppError;
use crate::utils::speed_convert::convert_speed;

/// The published sensor state: the value plus the attributes a renderer
/// needs to show provenance.
#[derive(Serialize, Deserialize)]
pub struct SpeedLimitResponse {
    pub speed_limit: Option<u32>,
    pub unit: SpeedUnit,
    pub road_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub data_source: String,
    pub active_provider: String,
    pub fallback_active: bool,
    pub last_update: DateTime<Utc>,
}

pub fn render_reading(state: &AppState, latest: &LatestReading) -> SpeedLimitResponse {
    let reading = &latest.outcome.reading;

    SpeedLimitResponse {
        speed_limit: convert_speed(reading.speed_limit, reading.unit, state.unit_preference),
        unit: state.unit_preference,
        road_name: reading.road_name.clone(),
        latitude: latest.coordinate.latitude,
        longitude: latest.coordinate.longitude,
        data_source: state.primary_provider().display_name().to_string(),
        active_provider: latest.outcome.active_provider.display_name().to_string(),
        fallback_active: latest.outcome.fallback_active,
        last_update: reading.fetched_at,
    }
}

pub async fn get_speed_limit(State(state): State<AppState>) -> Result<Response, AppError> {
    let latest = state.latest.read().await;

    match latest.as_ref() {
        Some(reading) => Ok(Json(render_reading(&state, reading)).into_response()),
        None => Err(AppError::not_found("No speed limit reading available yet")),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::app::gen_mock_app;
    use crate::types::coordinate::Coordinate;
    use crate::types::speed_limit::{ProviderKind, ResolutionOutcome, SpeedLimitReading};

    fn latest(speed_limit: Option<u32>, fallback_active: bool) -> LatestReading {
        LatestReading {
            outcome: ResolutionOutcome {
                reading: SpeedLimitReading {
                    speed_limit,
                    unit: SpeedUnit::Kmh,
                    road_name: Some("Main St".to_string()),
                    source: ProviderKind::OpenStreetMap,
                    fetched_at: Utc::now(),
                },
                active_provider: ProviderKind::OpenStreetMap,
                fallback_active,
            },
            coordinate: Coordinate::new(45.365097, -123.968731).unwrap(),
        }
    }

    #[tokio::test]
    async fn returns_not_found_before_the_first_cycle() {
        let mock_app = gen_mock_app().await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/speed-limit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn returns_the_latest_reading_with_attributes() {
        let mock_app = gen_mock_app().await;

        {
            let mut guard = mock_app.state.latest.write().await;
            *guard = Some(latest(Some(50), false));
        }

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/speed-limit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SpeedLimitResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(body.speed_limit, Some(50));
        assert_eq!(body.unit, SpeedUnit::Kmh);
        assert_eq!(body.road_name.as_deref(), Some("Main St"));
        assert_eq!(body.latitude, 45.365097);
        assert_eq!(body.longitude, -123.968731);
        assert_eq!(body.data_source, "OpenStreetMap");
        assert_eq!(body.active_provider, "OpenStreetMap");
        assert!(!body.fallback_active);
    }

    #[tokio::test]
    async fn null_reading_is_published_as_null_not_an_error() {
        let mock_app = gen_mock_app().await;

        {
            let mut guard = mock_app.state.latest.write().await;
            *guard = Some(latest(None, true));
        }

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/speed-limit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SpeedLimitResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(body.speed_limit, None);
        assert!(body.fallback_active);
    }
}
