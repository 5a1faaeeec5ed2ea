use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::speed_limit_service::resolver::SpeedLimitResolver;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{ProviderKind, ResolutionOutcome, SpeedUnit};
use crate::utils::location_extractor::LocationSnapshot;

/// The latest published cycle: the outcome plus the coordinate it was
/// resolved for. Superseded wholesale by the next cycle, never merged.
#[derive(Debug, Clone)]
pub struct LatestReading {
    pub outcome: ResolutionOutcome,
    pub coordinate: Coordinate,
}

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SpeedLimitResolver>,
    pub unit_preference: SpeedUnit,
    pub latest: Arc<RwLock<Option<LatestReading>>>,
    pub location: Arc<RwLock<Option<LocationSnapshot>>>,
    pub polling_active: Arc<AtomicBool>,
    pub auth_key: Option<String>,
}

impl AppState {
    pub fn primary_provider(&self) -> ProviderKind {
        self.resolver.primary()
    }
}
