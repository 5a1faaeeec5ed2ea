use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use urlencoding::encode;

use super::types::here_flow_response::HereFlowResponse;
use super::types::provider_error::ProviderError;
use super::SpeedLimitProvider;
use crate::types::coordinate::Coordinate;
use crate::types::speed_limit::{ProviderKind, SpeedLimitReading, SpeedUnit};

const FLOW_PATH: &str = "/v7/flow";
const SEARCH_RADIUS_METERS: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Speed limits from the HERE traffic flow API. Same shape as the TomTom
/// client against HERE's endpoint and field names; speeds arrive in km/h.
pub struct HereProvider {
    host: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HereProvider {
    pub fn new(host: String, api_key: Option<String>) -> Self {
        HereProvider {
            host,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SpeedLimitProvider for HereProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Here
    }

    async fn fetch_speed_limit(
        &self,
        coordinate: &Coordinate,
    ) -> Result<SpeedLimitReading, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::Unavailable("HERE API key not configured".to_string())
        })?;

        let circle = format!(
            "circle:{},{};r={}",
            coordinate.latitude, coordinate.longitude, SEARCH_RADIUS_METERS
        );
        let url = format!(
            "{}{}?locationReferencing=shape&in={}&apiKey={}",
            self.host,
            FLOW_PATH,
            encode(&circle),
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
            401 | 403 => {
                return Err(ProviderError::Unavailable(
                    "HERE API key is invalid or expired".to_string(),
                ))
            }
            429 => return Err(ProviderError::RateLimited),
            _ if !status.is_success() => {
                return Err(ProviderError::Upstream(format!(
                    "HERE returned status {}",
                    status
                )))
            }
            _ => {}
        }

        let body = response.json::<HereFlowResponse>().await.map_err(|e| {
            ProviderError::Upstream(format!("Failed to decode HERE response: {}", e))
        })?;

        let (speed_limit, road_name) = match body.results.into_iter().next() {
            Some(result) => (
                result
                    .current_flow
                    .and_then(|flow| flow.speed_limit)
                    .map(|speed| speed.round() as u32),
                result.location.and_then(|location| location.description),
            ),
            None => {
                debug!("No flow results at {:?}", coordinate);
                (None, None)
            }
        };

        Ok(SpeedLimitReading {
            speed_limit,
            unit: SpeedUnit::Kmh,
            road_name,
            source: ProviderKind::Here,
            fetched_at: Utc::now(),
        })
    }
}
