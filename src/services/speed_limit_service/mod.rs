use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{ProviderKind, SpeedLimitReading, SpeedUnit};

pub mod here_provider;
pub mod osm_provider;
pub mod resolver;
pub mod tomtom_provider;
pub mod types;

use here_provider::HereProvider;
use osm_provider::OsmProvider;
use tomtom_provider::TomTomProvider;
use types::provider_error::ProviderError;

/// One speed limit data source. Implementations issue exactly one read-only
/// request per call and normalize the response into the common schema.
#[async_trait]
pub trait SpeedLimitProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn fetch_speed_limit(
        &self,
        coordinate: &Coordinate,
    ) -> Result<SpeedLimitReading, ProviderError>;
}

/// Explicit mapping from provider kind to client, built once at startup and
/// handed to the resolver.
pub type ProviderRegistry = HashMap<ProviderKind, Arc<dyn SpeedLimitProvider>>;

pub struct ProviderConfig {
    pub unit_preference: SpeedUnit,
    pub tomtom_api_key: Option<String>,
    pub here_api_key: Option<String>,
    pub osm_host: String,
    pub tomtom_host: String,
    pub here_host: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            unit_preference: SpeedUnit::Kmh,
            tomtom_api_key: None,
            here_api_key: None,
            osm_host: "https://overpass-api.de".to_string(),
            tomtom_host: "https://api.tomtom.com".to_string(),
            here_host: "https://data.traffic.hereapi.com".to_string(),
        }
    }
}

pub fn build_registry(config: &ProviderConfig) -> ProviderRegistry {
    let mut providers: ProviderRegistry = HashMap::new();

    providers.insert(
        ProviderKind::OpenStreetMap,
        Arc::new(OsmProvider::new(
            config.osm_host.clone(),
            config.unit_preference,
        )),
    );
    providers.insert(
        ProviderKind::TomTom,
        Arc::new(TomTomProvider::new(
            config.tomtom_host.clone(),
            config.tomtom_api_key.clone(),
            config.unit_preference,
        )),
    );
    providers.insert(
        ProviderKind::Here,
        Arc::new(HereProvider::new(
            config.here_host.clone(),
            config.here_api_key.clone(),
        )),
    );

    providers
}
