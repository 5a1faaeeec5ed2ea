use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct TomTomFlowResponse {
    #[serde(rename = "flowSegmentData")]
    pub flow_segment_data: Option<TomTomFlowSegmentData>,
}

#[derive(Serialize, Deserialize)]
pub struct TomTomFlowSegmentData {
    #[serde(rename = "speedLimit")]
    pub speed_limit: Option<f64>,
    /// Functional road class, e.g. "FRC3". The flow API carries no street
    /// name, so this is the only road descriptor available.
    pub frc: Option<String>,
    #[serde(rename = "currentSpeed")]
    pub current_speed: Option<f64>,
    #[serde(rename = "freeFlowSpeed")]
    pub free_flow_speed: Option<f64>,
}
