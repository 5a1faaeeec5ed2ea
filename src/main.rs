mod app;
mod middlewares;
mod poller;
mod routes;
mod services;
mod types;
mod utils;

use std::env;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::app::AppSettings;
use crate::services::speed_limit_service::ProviderConfig;
use crate::types::speed_limit::{ProviderKind, SpeedUnit};
use crate::utils::location_extractor::{extract_coordinate, LocationReading, LocationSnapshot};

const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 300;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    info!("Starting road speed limits service...");

    let primary_provider = env::var("PRIMARY_PROVIDER")
        .ok()
        .and_then(|value| value.parse::<ProviderKind>().ok())
        .unwrap_or(ProviderKind::OpenStreetMap);
    let unit_preference = env::var("SPEED_UNIT")
        .ok()
        .and_then(|value| value.parse::<SpeedUnit>().ok())
        .unwrap_or(SpeedUnit::Kmh);
    let poll_interval = env::var("POLL_INTERVAL_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS);

    let settings = AppSettings {
        primary_provider,
        auth_key: env::var("AUTH_KEY").ok(),
        providers: ProviderConfig {
            unit_preference,
            tomtom_api_key: env::var("TOMTOM_API_KEY").ok(),
            here_api_key: env::var("HERE_API_KEY").ok(),
            ..ProviderConfig::default()
        },
    };

    info!(
        "Primary provider: {}, publishing in {}",
        primary_provider, unit_preference
    );

    let state = app::gen_state(settings);

    // A LOCATION env var ("<lat>,<lon>") seeds the first snapshot so the
    // poller has something to resolve before any /location push arrives.
    // A value that fails extraction is a configuration error.
    if let Ok(location) = env::var("LOCATION") {
        let snapshot = LocationSnapshot {
            primary: LocationReading {
                state: Some(location),
                ..Default::default()
            },
            secondary: None,
        };

        match extract_coordinate(&snapshot) {
            Ok(coordinate) => {
                info!(
                    "Initial location ({}, {})",
                    coordinate.latitude, coordinate.longitude
                );
                let mut guard = state.location.write().await;
                *guard = Some(snapshot);
            }
            Err(err) => {
                error!("Invalid LOCATION value: {}", err);
                std::process::exit(1);
            }
        }
    }

    let cancel = CancellationToken::new();
    poller::spawn(
        state.clone(),
        Duration::from_secs(poll_interval),
        cancel.clone(),
    );

    let app = app::gen_app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
