use serde::{Deserialize, Serialize};

use crate::types::coordinate::{Coordinate, CoordinateError};

/// One observed value from a location source: a textual state plus optional
/// GPS-style latitude/longitude attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationReading {
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The most recent readings the service was given. `secondary` only matters
/// when latitude and longitude arrive as two separate numeric readings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub primary: LocationReading,
    pub secondary: Option<LocationReading>,
}

/// Extract a validated coordinate from a snapshot.
///
/// Strategies are tried in fixed priority order, first structural match wins:
/// 1. both coordinates present as attributes on the primary reading,
/// 2. the primary state is a combined `"<lat>,<lon>"` string,
/// 3. primary and secondary states each hold one numeric component.
pub fn extract_coordinate(snapshot: &LocationSnapshot) -> Result<Coordinate, CoordinateError> {
    let primary = &snapshot.primary;

    if let (Some(latitude), Some(longitude)) = (primary.latitude, primary.longitude) {
        return Coordinate::new(latitude, longitude);
    }

    if let Some(state) = live_state(primary) {
        if let Some((lat_part, lon_part)) = state.split_once(',') {
            let latitude = parse_component(lat_part, "latitude")?;
            let longitude = parse_component(lon_part, "longitude")?;
            return Coordinate::new(latitude, longitude);
        }
    }

    let lat_state = live_state(primary)
        .ok_or_else(|| CoordinateError::Unavailable("no latitude reading".to_string()))?;
    let latitude = parse_component(lat_state, "latitude")?;

    let lon_state = snapshot
        .secondary
        .as_ref()
        .and_then(live_state)
        .ok_or_else(|| CoordinateError::Unavailable("no longitude reading".to_string()))?;
    let longitude = parse_component(lon_state, "longitude")?;

    Coordinate::new(latitude, longitude)
}

/// A reading's state, unless it is missing or an unavailability marker.
fn live_state(reading: &LocationReading) -> Option<&str> {
    let state = reading.state.as_deref()?.trim();

    match state {
        "" | "unavailable" | "unknown" => None,
        live => Some(live),
    }
}

fn parse_component(value: &str, component: &str) -> Result<f64, CoordinateError> {
    value.trim().parse::<f64>().map_err(|_| {
        CoordinateError::Invalid(format!(
            "could not parse {} value '{}' as a number",
            component,
            value.trim()
        ))
    })
}
