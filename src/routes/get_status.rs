use std::sync::atomic::Ordering;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::app_state::AppState;

#[derive(Serialize, Deserialize)]
pub struct GetStatusResponse {
    pub polling_active: bool,
    pub fallback_active: bool,
    pub data_source: String,
    pub active_provider: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Liveness and provenance in one place: whether the poller is running and
/// which provider served the latest reading.
pub async fn get_status(State(state): State<AppState>) -> Response {
    let latest = state.latest.read().await;

    Json(GetStatusResponse {
        polling_active: state.polling_active.load(Ordering::SeqCst),
        fallback_active: latest
            .as_ref()
            .map(|reading| reading.outcome.fallback_active)
            .unwrap_or(false),
        data_source: state.primary_provider().display_name().to_string(),
        active_provider: latest
            .as_ref()
            .map(|reading| reading.outcome.active_provider.display_name().to_string()),
        last_update: latest
            .as_ref()
            .map(|reading| reading.outcome.reading.fetched_at),
    })
    .into_response()
}
