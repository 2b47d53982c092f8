//! Caller-supplied coordinates.
//!
//! Query parameters arrive as optional strings; anything missing or not a
//! float is an [`InputError`] and never reaches the upstream.

use serde::{Deserialize, Serialize};
use sevzap_core::InputError;

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build from numeric values, rejecting non-finite or out-of-range ones.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        check_range("lat", latitude, 90.0)?;
        check_range("lon", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse `lat`/`lon` query parameters.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, InputError> {
        let latitude = parse_float("lat", lat)?;
        let longitude = parse_float("lon", lon)?;
        Self::new(latitude, longitude)
    }
}

fn parse_float(field: &str, raw: Option<&str>) -> Result<f64, InputError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| InputError::MissingParameter(field.to_string()))?;

    raw.parse::<f64>().map_err(|_| InputError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn check_range(field: &str, value: f64, bound: f64) -> Result<(), InputError> {
    if !value.is_finite() || value.abs() > bound {
        return Err(InputError::OutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_coordinates() {
        let coords = Coordinates::parse(Some("59.9"), Some(" 30.3 ")).unwrap();
        assert_eq!(coords.latitude, 59.9);
        assert_eq!(coords.longitude, 30.3);
    }

    #[test]
    fn test_missing_lat_is_input_error() {
        let err = Coordinates::parse(None, Some("30.3")).unwrap_err();
        assert_eq!(err, InputError::MissingParameter("lat".to_string()));
    }

    #[test]
    fn test_blank_lon_is_missing() {
        let err = Coordinates::parse(Some("59.9"), Some("  ")).unwrap_err();
        assert_eq!(err, InputError::MissingParameter("lon".to_string()));
    }

    #[test]
    fn test_non_numeric_is_input_error() {
        let err = Coordinates::parse(Some("north"), Some("30.3")).unwrap_err();
        assert!(matches!(err, InputError::InvalidNumber { ref field, ref value } if field == "lat" && value == "north"));
    }

    #[test]
    fn test_nan_and_out_of_range_rejected() {
        assert!(matches!(
            Coordinates::parse(Some("NaN"), Some("30.3")),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5),
            Err(InputError::OutOfRange { .. })
        ));
    }
}
