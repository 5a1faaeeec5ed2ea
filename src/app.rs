use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::{
    middlewares::auth::auth_middleware,
    routes::apply_routes,
    services::speed_limit_service::{build_registry, resolver::SpeedLimitResolver, ProviderConfig},
    types::app_state::AppState,
    types::speed_limit::ProviderKind,
};

pub struct AppSettings {
    pub primary_provider: ProviderKind,
    pub auth_key: Option<String>,
    pub providers: ProviderConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            primary_provider: ProviderKind::OpenStreetMap,
            auth_key: None,
            providers: ProviderConfig::default(),
        }
    }
}

pub fn gen_state(settings: AppSettings) -> AppState {
    let registry = build_registry(&settings.providers);

    AppState {
        resolver: Arc::new(SpeedLimitResolver::new(
            registry,
            settings.primary_provider,
        )),
        unit_preference: settings.providers.unit_preference,
        latest: Arc::new(RwLock::new(None)),
        location: Arc::new(RwLock::new(None)),
        polling_active: Arc::new(AtomicBool::new(false)),
        auth_key: settings.auth_key,
    }
}

pub fn gen_app(state: AppState) -> Router {
    let cors_middleware = CorsLayer::new();

    apply_routes(Router::new())
        .route("/", get(root))
        .layer(cors_middleware)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

// basic handler that responds with a static string
async fn root() -> &'static str {
    "Road Speed Limits API"
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub state: AppState,
    pub osm_server: mockito::ServerGuard,
    pub tomtom_server: mockito::ServerGuard,
    pub here_server: mockito::ServerGuard,
}

/// An app wired to per-provider mockito servers. OpenStreetMap is the
/// primary; the commercial providers get test keys so their clients are
/// exercised whenever a test points the resolver at them.
#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    gen_mock_app_with_primary(ProviderKind::OpenStreetMap).await
}

#[cfg(test)]
pub async fn gen_mock_app_with_primary(primary: ProviderKind) -> MockApp {
    let osm_server = mockito::Server::new_async().await;
    let tomtom_server = mockito::Server::new_async().await;
    let here_server = mockito::Server::new_async().await;

    let settings = AppSettings {
        primary_provider: primary,
        auth_key: None,
        providers: ProviderConfig {
            tomtom_api_key: Some("test-key".to_string()),
            here_api_key: Some("test-key".to_string()),
            osm_host: osm_server.url(),
            tomtom_host: tomtom_server.url(),
            here_host: here_server.url(),
            ..ProviderConfig::default()
        },
    };

    let state = gen_state(settings);

    MockApp {
        app: gen_app(state.clone()),
        state,
        osm_server,
        tomtom_server,
        here_server,
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn root_responds() {
        let state = gen_state(AppSettings::default());
        let app = gen_app(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn configured_auth_key_guards_routes() {
        let state = gen_state(AppSettings {
            auth_key: Some("secret".to_string()),
            ..AppSettings::default()
        });
        let app = gen_app(state);

        let denied = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = app
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header("x-api-key", "secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fallback_is_exercised_end_to_end() {
        let mut mock_app = gen_mock_app_with_primary(ProviderKind::TomTom).await;

        // TomTom rate limits, OpenStreetMap answers.
        mock_app
            .tomtom_server
            .mock("GET", mockito::Matcher::Regex("/traffic/.*".to_string()))
            .match_query(mockito::Matcher::Regex(".*".to_string()))
            .with_status(429)
            .create_async()
            .await;

        mock_app
            .osm_server
            .mock("POST", "/api/interpreter")
            .with_body(
                serde_json::json!({"elements": [{
                    "type": "node",
                    "lat": 45.3651,
                    "lon": -123.9687,
                    "tags": {"maxspeed": "30"}
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/speed-limit/lookup?lat=45.365097&lon=-123.968731")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["speed_limit"], 30);
        assert_eq!(body["active_provider"], "OpenStreetMap");
        assert_eq!(body["fallback_active"], true);
    }

    #[tokio::test]
    async fn rejected_here_credential_falls_back_end_to_end() {
        let mut mock_app = gen_mock_app_with_primary(ProviderKind::Here).await;

        mock_app
            .here_server
            .mock("GET", "/v7/flow")
            .match_query(mockito::Matcher::Regex(".*".to_string()))
            .with_status(401)
            .create_async()
            .await;

        mock_app
            .osm_server
            .mock("POST", "/api/interpreter")
            .with_body(
                serde_json::json!({"elements": [{
                    "type": "node",
                    "lat": 45.3651,
                    "lon": -123.9687,
                    "tags": {"maxspeed": "30"}
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/speed-limit/lookup?lat=45.365097&lon=-123.968731")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["speed_limit"], 30);
        assert_eq!(body["active_provider"], "OpenStreetMap");
        assert_eq!(body["fallback_active"], true);
    }
}
