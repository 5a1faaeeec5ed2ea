use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{types::app_state::AppState, utils::app_error::AppError};

/// Shared-key guard over every route. When no key is configured the service
/// is open, which is the common case for a LAN deployment.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(ref auth_key) = state.auth_key else {
        return Ok(next.run(request).await);
    };

    match headers.get("x-api-key") {
        Some(header) if header == auth_key => Ok(next.run(request).await),
        _ => Err(AppError::new(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}
