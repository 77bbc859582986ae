//! Deferred expressions over catalog assets.
//!
//! Building an expression never touches the catalog. Only
//! [`Realizer`](crate::realize::Realizer) evaluates them, which keeps every
//! remote failure at one explicit boundary.

use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::feature::Feature;

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BBox {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        BBox {
            west,
            south,
            east,
            north,
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new((self.west, self.south), (self.east, self.north))
    }

    /// Center as (lon, lat).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

impl From<Rect<f64>> for BBox {
    fn from(rect: Rect<f64>) -> Self {
        BBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// One deferred step applied to a feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CollectionOp {
    /// Keep features whose geometry intersects the point.
    FilterBounds { lon: f64, lat: f64 },
    /// Keep features whose geometry intersects the box.
    FilterBbox { bbox: BBox },
    /// Keep at most `count` features, in source order.
    Limit { count: usize },
}

/// Lazy handle to a vector feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionExpr {
    pub asset: String,
    pub ops: Vec<CollectionOp>,
}

impl CollectionExpr {
    pub fn asset(id: impl Into<String>) -> Self {
        CollectionExpr {
            asset: id.into(),
            ops: Vec::new(),
        }
    }

    pub fn filter_bounds(mut self, lon: f64, lat: f64) -> Self {
        self.ops.push(CollectionOp::FilterBounds { lon, lat });
        self
    }

    pub fn filter_bbox(mut self, bbox: BBox) -> Self {
        self.ops.push(CollectionOp::FilterBbox { bbox });
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.ops.push(CollectionOp::Limit { count });
        self
    }

    pub fn first(self) -> Self {
        self.limit(1)
    }

    /// Evaluate the op chain over the realized source features.
    pub fn apply(&self, mut features: Vec<Feature>) -> Vec<Feature> {
        for op in &self.ops {
            match op {
                CollectionOp::FilterBounds { lon, lat } => {
                    let point = Point::new(*lon, *lat);
                    features.retain(|f| f.intersects_point(&point));
                }
                CollectionOp::FilterBbox { bbox } => {
                    let rect = bbox.to_rect();
                    features.retain(|f| f.intersects_rect(&rect));
                }
                CollectionOp::Limit { count } => features.truncate(*count),
            }
        }
        features
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    Asset { id: String },
    /// Feature outlines painted onto an empty single-band image.
    Paint {
        collection: CollectionExpr,
        width: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ImageOp {
    Hillshade,
    ClipToCollection { collection: CollectionExpr },
}

/// Lazy handle to a raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageExpr {
    pub source: ImageSource,
    pub ops: Vec<ImageOp>,
}

impl ImageExpr {
    pub fn asset(id: impl Into<String>) -> Self {
        ImageExpr {
            source: ImageSource::Asset { id: id.into() },
            ops: Vec::new(),
        }
    }

    pub fn paint(collection: CollectionExpr, width: u32) -> Self {
        ImageExpr {
            source: ImageSource::Paint { collection, width },
            ops: Vec::new(),
        }
    }

    pub fn hillshade(mut self) -> Self {
        self.ops.push(ImageOp::Hillshade);
        self
    }

    pub fn clip_to_collection(mut self, collection: CollectionExpr) -> Self {
        self.ops.push(ImageOp::ClipToCollection { collection });
        self
    }

    /// Raster asset at the root of the expression, if any.
    pub fn image_asset(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Asset { id } => Some(id),
            ImageSource::Paint { .. } => None,
        }
    }

    /// Every collection the expression reads from.
    pub fn collections(&self) -> Vec<&CollectionExpr> {
        let mut collections = Vec::new();
        if let ImageSource::Paint { collection, .. } = &self.source {
            collections.push(collection);
        }
        for op in &self.ops {
            if let ImageOp::ClipToCollection { collection } = op {
                collections.push(collection);
            }
        }
        collections
    }
}

/// Typed lazy handle returned by the catalog client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Handle {
    Collection(CollectionExpr),
    Image(ImageExpr),
}

impl Handle {
    /// Distinct asset identifiers referenced by the handle, in first-seen order.
    pub fn asset_ids(&self) -> Vec<&str> {
        let candidates: Vec<&str> = match self {
            Handle::Collection(c) => vec![c.asset.as_str()],
            Handle::Image(image) => image
                .image_asset()
                .into_iter()
                .chain(image.collections().into_iter().map(|c| c.asset.as_str()))
                .collect(),
        };
        let mut ids: Vec<&str> = Vec::with_capacity(candidates.len());
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

impl From<CollectionExpr> for Handle {
    fn from(expr: CollectionExpr) -> Self {
        Handle::Collection(expr)
    }
}

impl From<ImageExpr> for Handle {
    fn from(expr: ImageExpr) -> Self {
        Handle::Image(expr)
    }
}
