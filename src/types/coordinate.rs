use serde::{Deserialize, Serialize};

/// A validated geographic position. Constructed fresh each cycle, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CoordinateError {
    /// The referenced reading or value does not exist.
    Unavailable(String),
    /// A value could not be parsed, or lies outside the valid range.
    Invalid(String),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CoordinateError::Unavailable(what) => {
                write!(f, "Coordinate unavailable: {}", what)
            }
            CoordinateError::Invalid(what) => write!(f, "Invalid coordinate: {}", what),
        }
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Invalid(format!(
                "latitude {} is out of range (-90 to 90)",
                latitude
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Invalid(format!(
                "longitude {} is out of range (-180 to 180)",
                longitude
            )));
        }

        Ok(Coordinate {
            latitude,
            longitude,
        })
    }
}
