use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::types::overpass_response::{OverpassElement, OverpassResponse};
use super::types::provider_error::ProviderError;
use super::SpeedLimitProvider;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{ProviderKind, SpeedLimitReading, SpeedUnit};

const SEARCH_RADIUS_METERS: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Speed limits from the OpenStreetMap Overpass API. Needs no credential,
/// which is why it doubles as the fallback for the commercial providers.
pub struct OsmProvider {
    host: String,
    unit_preference: SpeedUnit,
    client: reqwest::Client,
}

impl OsmProvider {
    pub fn new(host: String, unit_preference: SpeedUnit) -> Self {
        OsmProvider {
            host,
            unit_preference,
            client: reqwest::Client::new(),
        }
    }

    /// Pick the element closest to the queried position. Elements without a
    /// usable position sort last so a located node beats an unlocated way.
    fn nearest_reading(
        &self,
        response: OverpassResponse,
        origin: &Coordinate,
    ) -> SpeedLimitReading {
        let mut candidates: Vec<Candidate> = response
            .elements
            .into_iter()
            .filter(|element| element.tags.maxspeed.is_some())
            .map(|element| self.candidate_from(element, origin))
            .collect();

        candidates.sort_by(|a, b| {
            let left = a.distance.unwrap_or(f64::INFINITY);
            let right = b.distance.unwrap_or(f64::INFINITY);
            left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal)
        });

        match candidates.into_iter().next() {
            Some(closest) => {
                debug!(
                    "Closest road is {:?}m away with speed limit {:?} {}",
                    closest.distance.map(|d| d.round()),
                    closest.speed_limit,
                    closest.unit,
                );

                SpeedLimitReading {
                    speed_limit: closest.speed_limit,
                    unit: closest.unit,
                    road_name: closest.road_name,
                    source: ProviderKind::OpenStreetMap,
                    fetched_at: Utc::now(),
                }
            }
            None => {
                debug!("No speed limit data found at {:?}", origin);

                SpeedLimitReading {
                    speed_limit: None,
                    unit: self.unit_preference,
                    road_name: None,
                    source: ProviderKind::OpenStreetMap,
                    fetched_at: Utc::now(),
                }
            }
        }
    }

    fn candidate_from(&self, element: OverpassElement, origin: &Coordinate) -> Candidate {
        let (speed_limit, unit) = match element.tags.maxspeed.as_deref() {
            Some(raw) => self.parse_maxspeed(raw),
            None => (None, self.unit_preference),
        };

        // Nodes carry their own position; ways may expose one, or at least
        // a bounding box to take the center of.
        let position = match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => element.bounds.as_ref().map(|bounds| {
                (
                    (bounds.minlat + bounds.maxlat) / 2.0,
                    (bounds.minlon + bounds.maxlon) / 2.0,
                )
            }),
        };

        Candidate {
            distance: position.map(|(lat, lon)| haversine_distance_meters(origin, lat, lon)),
            speed_limit,
            unit,
            road_name: element.tags.name,
        }
    }

    /// Parse a raw `maxspeed` tag. Tags come as `"50"`, `"30 mph"`,
    /// `"80 km/h"`, `"none"`, and the occasional garbage.
    fn parse_maxspeed(&self, raw: &str) -> (Option<u32>, SpeedUnit) {
        let value = raw.trim().to_lowercase();

        if value == "none" || value == "unlimited" {
            return (None, SpeedUnit::Kmh);
        }

        if value.contains("mph") {
            return match value.replace("mph", "").trim().parse::<f64>() {
                Ok(speed) => (Some(speed.round() as u32), SpeedUnit::Mph),
                Err(_) => {
                    warn!("Could not parse maxspeed value: {}", raw);
                    (None, SpeedUnit::Kmh)
                }
            };
        }

        if value.contains("km/h") || value.contains("kmh") {
            let cleaned = value.replace("km/h", "").replace("kmh", "");
            return match cleaned.trim().parse::<f64>() {
                Ok(speed) => (Some(speed.round() as u32), SpeedUnit::Kmh),
                Err(_) => {
                    warn!("Could not parse maxspeed value: {}", raw);
                    (None, SpeedUnit::Kmh)
                }
            };
        }

        match value.parse::<f64>() {
            Ok(speed) => (Some(speed.round() as u32), self.unit_preference),
            Err(_) => {
                warn!("Could not parse maxspeed value: {}", raw);
                (None, SpeedUnit::Kmh)
            }
        }
    }
}

struct Candidate {
    distance: Option<f64>,
    speed_limit: Option<u32>,
    unit: SpeedUnit,
    road_name: Option<String>,
}

#[async_trait]
impl SpeedLimitProvider for OsmProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenStreetMap
    }

    async fn fetch_speed_limit(
        &self,
        coordinate: &Coordinate,
    ) -> Result<SpeedLimitReading, ProviderError> {
        let query = format!(
            "[out:json];(way(around:{radius},{lat},{lon})[\"maxspeed\"];node(around:{radius},{lat},{lon})[\"maxspeed\"];);out body;",
            radius = SEARCH_RADIUS_METERS,
            lat = coordinate.latitude,
            lon = coordinate.longitude,
        );

        let response = self
            .client
            .post(format!("{}/api/interpreter", self.host))
            .timeout(REQUEST_TIMEOUT)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(ProviderError::from_request)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Upstream(format!(
                "Overpass returned status {}",
                status
            )));
        }

        let body = response.json::<OverpassResponse>().await.map_err(|e| {
            ProviderError::Upstream(format!("Failed to decode Overpass response: {}", e))
        })?;

        Ok(self.nearest_reading(body, coordinate))
    }
}

/// Haversine great-circle distance in meters.
fn haversine_distance_meters(origin: &Coordinate, lat: f64, lon: f64) -> f64 {
    let origin_lat = origin.latitude.to_radians();
    let target_lat = lat.to_radians();
    let delta_lat = (lat - origin.latitude).to_radians();
    let delta_lon = (lon - origin.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + origin_lat.cos() * target_lat.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
