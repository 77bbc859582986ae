use geo::{Geometry, Intersects, Point, Rect};
use geojson::{feature::Id, GeoJson};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

/// Attribute table of a single feature.
pub type Properties = Map<String, Value>;

/// A vector feature: optional geometry plus its attribute map.
///
/// Geometries are kept in geographic coordinates (EPSG:4326, degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub geometry: Option<Geometry<f64>>,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Option<Geometry<f64>>, properties: Properties) -> Self {
        Feature {
            id: None,
            geometry,
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String attribute. Numbers are not coerced.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    /// Numeric attribute. Shapefile-derived tables sometimes carry numbers as
    /// strings, so those are parsed as well.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.property(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Features without a geometry never intersect anything.
    pub fn intersects_point(&self, point: &Point<f64>) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|geometry| geometry.intersects(point))
    }

    pub fn intersects_rect(&self, rect: &Rect<f64>) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|geometry| geometry.intersects(rect))
    }

    fn from_geojson(id: &str, feature: geojson::Feature) -> Result<Feature> {
        let geometry = match feature.geometry {
            Some(g) => Some(
                Geometry::<f64>::try_from(g).map_err(|e| CatalogError::malformed(id, e))?,
            ),
            None => None,
        };
        let feature_id = feature.id.map(|fid| match fid {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        });
        Ok(Feature {
            id: feature_id,
            geometry,
            properties: feature.properties.unwrap_or_default(),
        })
    }
}

/// Parse a GeoJSON document into features, keeping document order.
///
/// A bare `Feature` document is accepted as a one-element collection; a bare
/// geometry is not a table and is rejected.
pub fn parse_features(id: &str, text: &str) -> Result<Vec<Feature>> {
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|e| CatalogError::malformed(id, e))?;
    match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(|f| Feature::from_geojson(id, f))
            .collect(),
        GeoJson::Feature(f) => Ok(vec![Feature::from_geojson(id, f)?]),
        GeoJson::Geometry(_) => Err(CatalogError::malformed(
            id,
            "expected a FeatureCollection, found a bare geometry",
        )),
    }
}
