use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The data sources a speed limit can be fetched from. OpenStreetMap needs
/// no credential and doubles as the fallback for the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenStreetMap,
    TomTom,
    Here,
}

impl ProviderKind {
    /// Human-readable name used in published attributes and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenStreetMap => "OpenStreetMap",
            ProviderKind::TomTom => "TomTom",
            ProviderKind::Here => "HERE Maps",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "openstreetmap" | "osm" => Ok(ProviderKind::OpenStreetMap),
            "tomtom" => Ok(ProviderKind::TomTom),
            "here" => Ok(ProviderKind::Here),
            other => Err(format!("Unknown provider '{}'", other)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "km/h")]
    Kmh,
    #[serde(rename = "mph")]
    Mph,
}

impl std::str::FromStr for SpeedUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "km/h" | "kmh" | "kmph" => Ok(SpeedUnit::Kmh),
            "mph" => Ok(SpeedUnit::Mph),
            other => Err(format!("Unknown speed unit '{}'", other)),
        }
    }
}

impl std::fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SpeedUnit::Kmh => write!(f, "km/h"),
            SpeedUnit::Mph => write!(f, "mph"),
        }
    }
}

/// A normalized answer from one provider. `speed_limit: None` means the
/// provider answered but found no posted limit nearby, which is distinct
/// from a failed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimitReading {
    pub speed_limit: Option<u32>,
    pub unit: SpeedUnit,
    pub road_name: Option<String>,
    pub source: ProviderKind,
    pub fetched_at: DateTime<Utc>,
}

/// The resolver's final product for one cycle. `active_provider` names
/// whichever provider actually produced the reading; `fallback_active` is
/// true iff that differs from the configured primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub reading: SpeedLimitReading,
    pub active_provider: ProviderKind,
    pub fallback_active: bool,
}
