use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

/// Longitude shown before the user picks anything.
pub const DEFAULT_LON: f64 = -100.0;

/// Latitude shown before the user picks anything.
pub const DEFAULT_LAT: f64 = 40.0;

/// A selected point in geographic coordinates (EPSG:4326, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    lon: f64,
    lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);
        if !valid {
            return Err(ExplorerError::InvalidLocation { lon, lat });
        }
        Ok(Location { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location {
            lon: DEFAULT_LON,
            lat: DEFAULT_LAT,
        }
    }
}

/// Payload of a map click event, e.g. `{"lng": -99.1, "lat": 47.1}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapClick {
    pub lng: f64,
    pub lat: f64,
}

impl TryFrom<MapClick> for Location {
    type Error = ExplorerError;

    fn try_from(click: MapClick) -> Result<Self> {
        Location::new(click.lng, click.lat)
    }
}
