use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Serialize, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub bounds: Option<OverpassBounds>,
    #[serde(default)]
    pub tags: OverpassTags,
}

#[derive(Serialize, Deserialize)]
pub struct OverpassBounds {
    pub minlat: f64,
    pub minlon: f64,
    pub maxlat: f64,
    pub maxlon: f64,
}

#[derive(Serialize, Deserialize, Default)]
pub struct OverpassTags {
    pub maxspeed: Option<String>,
    pub name: Option<String>,
}
