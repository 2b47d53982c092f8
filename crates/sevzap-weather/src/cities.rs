//! Fixed registry of cities shown on the regional weather board.

use serde::Serialize;

use crate::location::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

/// North-West region, in display order.
pub const CITIES: &[City] = &[
    City::new("Saint Petersburg", 59.9386, 30.3141),
    City::new("Petrozavodsk", 61.7850, 34.3469),
    City::new("Murmansk", 68.9730, 33.0925),
    City::new("Pskov", 57.8136, 28.3496),
    City::new("Veliky Novgorod", 58.5215, 31.2755),
    City::new("Kaliningrad", 54.7104, 20.4522),
];
