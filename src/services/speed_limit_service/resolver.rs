use chrono::Utc;
use tracing::{debug, error, warn};

use super::types::provider_error::ProviderError;
use super::ProviderRegistry;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{
    ProviderKind, ResolutionOutcome, SpeedLimitReading, SpeedUnit,
};

/// Orchestrates one resolution per cycle: the configured primary provider
/// first, OpenStreetMap as fallback, a degraded outcome when both fail.
/// Never fails to its caller; each provider is attempted at most once, and
/// the next cycle starts again from the primary.
pub struct SpeedLimitResolver {
    providers: ProviderRegistry,
    primary: ProviderKind,
}

impl SpeedLimitResolver {
    pub fn new(providers: ProviderRegistry, primary: ProviderKind) -> Self {
        SpeedLimitResolver { providers, primary }
    }

    pub fn primary(&self) -> ProviderKind {
        self.primary
    }

    pub async fn resolve(&self, coordinate: &Coordinate) -> ResolutionOutcome {
        match self.attempt(self.primary, coordinate).await {
            Ok(reading) => ResolutionOutcome {
                reading,
                active_provider: self.primary,
                fallback_active: false,
            },
            Err(err) if self.primary == ProviderKind::OpenStreetMap => {
                // No further fallback exists behind OpenStreetMap.
                error!(
                    "OpenStreetMap failed ({}) at {:?}: {}",
                    err.kind(),
                    coordinate,
                    err
                );
                ResolutionOutcome {
                    reading: degraded_reading(ProviderKind::OpenStreetMap),
                    active_provider: ProviderKind::OpenStreetMap,
                    fallback_active: false,
                }
            }
            Err(err) => {
                warn!(
                    "Primary provider {} failed ({}) at {:?}, falling back to OpenStreetMap: {}",
                    self.primary,
                    err.kind(),
                    coordinate,
                    err
                );
                self.fall_back(coordinate).await
            }
        }
    }

    async fn fall_back(&self, coordinate: &Coordinate) -> ResolutionOutcome {
        match self.attempt(ProviderKind::OpenStreetMap, coordinate).await {
            Ok(reading) => ResolutionOutcome {
                reading,
                active_provider: ProviderKind::OpenStreetMap,
                fallback_active: true,
            },
            Err(err) => {
                error!(
                    "OpenStreetMap fallback also failed ({}) at {:?}: {}",
                    err.kind(),
                    coordinate,
                    err
                );
                ResolutionOutcome {
                    reading: degraded_reading(ProviderKind::OpenStreetMap),
                    active_provider: ProviderKind::OpenStreetMap,
                    fallback_active: true,
                }
            }
        }
    }

    async fn attempt(
        &self,
        kind: ProviderKind,
        coordinate: &Coordinate,
    ) -> Result<SpeedLimitReading, ProviderError> {
        match self.providers.get(&kind) {
            Some(provider) => {
                debug!("Querying {} at {:?}", provider.kind(), coordinate);
                provider.fetch_speed_limit(coordinate).await
            }
            None => Err(ProviderError::Unavailable(format!(
                "{} is not registered",
                kind
            ))),
        }
    }
}

fn degraded_reading(source: ProviderKind) -> SpeedLimitReading {
    SpeedLimitReading {
        speed_limit: None,
        unit: SpeedUnit::Kmh,
        road_name: None,
        source,
        fetched_at: Utc::now(),
    }
}
