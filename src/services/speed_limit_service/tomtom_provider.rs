use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use urlencoding::encode;

use super::types::provider_error::ProviderError;
use super::types::tomtom_flow_response::TomTomFlowResponse;
use super::SpeedLimitProvider;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{ProviderKind, SpeedLimitReading, SpeedUnit};

const FLOW_SEGMENT_PATH: &str = "/traffic/services/4/flowSegmentData/absolute/10/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Speed limits from the TomTom traffic flow-segment API. Requires an API
/// key; without one every call reports the provider as unavailable.
pub struct TomTomProvider {
    host: String,
    api_key: Option<String>,
    unit_preference: SpeedUnit,
    client: reqwest::Client,
}

impl TomTomProvider {
    pub fn new(host: String, api_key: Option<String>, unit_preference: SpeedUnit) -> Self {
        TomTomProvider {
            host,
            api_key,
            unit_preference,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SpeedLimitProvider for TomTomProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::TomTom
    }

    async fn fetch_speed_limit(
        &self,
        coordinate: &Coordinate,
    ) -> Result<SpeedLimitReading, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::Unavailable("TomTom API key not configured".to_string())
        })?;

        let point = format!("{},{}", coordinate.latitude, coordinate.longitude);
        let unit = match self.unit_preference {
            SpeedUnit::Kmh => "KMPH",
            SpeedUnit::Mph => "MPH",
        };
        let url = format!(
            "{}{}?point={}&unit={}&key={}",
            self.host,
            FLOW_SEGMENT_PATH,
            encode(&point),
            unit,
            encode(api_key),
        );

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ProviderError::from_request)?;

        let status = response.status();
        match status.as_u16() {
            403 => {
                return Err(ProviderError::Unavailable(
                    "TomTom API key is invalid or expired".to_string(),
                ))
            }
            429 => return Err(ProviderError::RateLimited),
            _ if !status.is_success() => {
                return Err(ProviderError::Upstream(format!(
                    "TomTom returned status {}",
                    status
                )))
            }
            _ => {}
        }

        let body = response.json::<TomTomFlowResponse>().await.map_err(|e| {
            ProviderError::Upstream(format!("Failed to decode TomTom response: {}", e))
        })?;

        let (speed_limit, road_name) = match body.flow_segment_data {
            Some(segment) => (
                segment.speed_limit.map(|speed| speed.round() as u32),
                segment.frc,
            ),
            None => {
                debug!("No flow segment data at {:?}", coordinate);
                (None, None)
            }
        };

        Ok(SpeedLimitReading {
            speed_limit,
            unit: self.unit_preference,
            road_name,
            source: ProviderKind::TomTom,
            fetched_at: Utc::now(),
        })
    }
}
