use axum::{
    routing::{get, post},
    Router,
};

use crate::types::app_state::AppState;

pub mod get_speed_limit;
mod get_speed_limit_lookup;
mod get_status;
mod post_location;
mod post_refresh;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/speed-limit", get(get_speed_limit::get_speed_limit))
        .route(
            "/speed-limit/lookup",
            get(get_speed_limit_lookup::get_speed_limit_lookup),
        )
        .route("/speed-limit/refresh", post(post_refresh::post_refresh))
        .route("/location", post(post_location::post_location))
        .route("/status", get(get_status::get_status))
}
