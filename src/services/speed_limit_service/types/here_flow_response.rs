use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HereFlowResponse {
    #[serde(default)]
    pub results: Vec<HereFlowResult>,
}

#[derive(Serialize, Deserialize)]
pub struct HereFlowResult {
    pub location: Option<HereFlowLocation>,
    #[serde(rename = "currentFlow")]
    pub current_flow: Option<HereCurrentFlow>,
}

#[derive(Serialize, Deserialize)]
pub struct HereFlowLocation {
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct HereCurrentFlow {
    #[serde(rename = "speedLimit")]
    pub speed_limit: Option<f64>,
}
