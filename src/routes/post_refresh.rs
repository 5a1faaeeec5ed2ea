use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::poller::{run_cycle, CycleError};
use crate::routes::get_speed_limit::render_reading;
use crate::types::app_state::AppState;
use crate::utils::app_error::AppError;

/// Run one cycle immediately instead of waiting for the next tick.
pub async fn post_refresh(State(state): State<AppState>) -> Result<Response, AppError> {
    let reading = run_cycle(&state).await.map_err(|e| match e {
        CycleError::NoLocation => AppError::conflict(e.to_string()),
        CycleError::Coordinate(_) => AppError::bad_request(e.to_string()),
    })?;

    Ok(Json(render_reading(&state, &reading)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::app::gen_mock_app;
    use crate::routes::get_speed_limit::SpeedLimitResponse;
    use crate::utils::location_extractor::{LocationReading, LocationSnapshot};

    fn refresh_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/speed-limit/refresh")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn refresh_without_location_conflicts() {
        let mock_app = gen_mock_app().await;

        let response = mock_app.app.oneshot(refresh_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    #[traced_test]
    async fn refresh_runs_a_full_cycle() {
        let mut mock_app = gen_mock_app().await;

        let mock = mock_app
            .osm_server
            .mock("POST", "/api/interpreter")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"elements": [{
                    "type": "node",
                    "lat": 45.3651,
                    "lon": -123.9687,
                    "tags": {"maxspeed": "50", "name": "Main St"}
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        {
            let mut location = mock_app.state.location.write().await;
            *location = Some(LocationSnapshot {
                primary: LocationReading {
                    state: Some("45.365097,-123.968731".to_string()),
                    ..Default::default()
                },
                secondary: None,
            });
        }

        let response = mock_app.app.oneshot(refresh_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: SpeedLimitResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(body.speed_limit, Some(50));
        assert_eq!(body.road_name.as_deref(), Some("Main St"));
        assert_eq!(body.active_provider, "OpenStreetMap");
        assert!(!body.fallback_active);

        // The cycle also published its outcome.
        assert!(mock_app.state.latest.read().await.is_some());
    }

    #[tokio::test]
    async fn refresh_with_invalid_location_is_a_bad_request() {
        let mock_app = gen_mock_app().await;

        {
            let mut location = mock_app.state.location.write().await;
            *location = Some(LocationSnapshot {
                primary: LocationReading {
                    state: Some("91,200".to_string()),
                    ..Default::default()
                },
                secondary: None,
            });
        }

        let response = mock_app.app.oneshot(refresh_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
