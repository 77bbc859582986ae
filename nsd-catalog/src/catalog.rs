use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::feature::Feature;

/// What a catalog identifier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Table,
    Image,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Table => write!(f, "feature collection"),
            AssetKind::Image => write!(f, "image"),
        }
    }
}

/// Metadata of a raster asset. Pixels stay in the catalog; renderers fetch
/// tiles on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: String,
    #[serde(default)]
    pub bands: Vec<String>,
    #[serde(default)]
    pub crs: Option<String>,
}

/// A read-only geospatial catalog addressed by string identifiers.
///
/// Implementations perform the actual I/O; callers should go through a
/// [`Realizer`](crate::realize::Realizer) so every call is time-bounded.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Check that `id` exists and report its kind.
    async fn describe(&self, id: &str) -> Result<AssetKind>;

    /// Fetch every feature of a table asset, in catalog order.
    async fn features(&self, id: &str) -> Result<Vec<Feature>>;

    /// Fetch the metadata of an image asset.
    async fn image(&self, id: &str) -> Result<ImageInfo>;
}

#[derive(Debug, Clone)]
enum Asset {
    Table(Vec<Feature>),
    Image(ImageInfo),
}

/// In-process catalog, used for tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    assets: HashMap<String, Asset>,
    outages: Vec<String>,
    latency: Option<Duration>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, id: impl Into<String>, features: Vec<Feature>) -> Self {
        self.assets.insert(id.into(), Asset::Table(features));
        self
    }

    pub fn with_image(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        let info = ImageInfo {
            id: id.clone(),
            bands: vec!["b1".to_string()],
            crs: Some("EPSG:4326".to_string()),
        };
        self.assets.insert(id, Asset::Image(info));
        self
    }

    /// Requests for `id` fail as if the service were down.
    pub fn with_outage(mut self, id: impl Into<String>) -> Self {
        self.outages.push(id.into());
        self
    }

    /// Every request sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn lookup(&self, id: &str) -> Result<&Asset> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.outages.iter().any(|o| o == id) {
            return Err(CatalogError::Unavailable(format!("{} is temporarily offline", id)));
        }
        debug!("memory catalog lookup {}", id);
        self.assets
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

impl Catalog for MemoryCatalog {
    async fn describe(&self, id: &str) -> Result<AssetKind> {
        Ok(match self.lookup(id).await? {
            Asset::Table(_) => AssetKind::Table,
            Asset::Image(_) => AssetKind::Image,
        })
    }

    async fn features(&self, id: &str) -> Result<Vec<Feature>> {
        match self.lookup(id).await? {
            Asset::Table(features) => Ok(features.clone()),
            Asset::Image(_) => Err(CatalogError::WrongKind {
                id: id.to_string(),
                expected: AssetKind::Table,
            }),
        }
    }

    async fn image(&self, id: &str) -> Result<ImageInfo> {
        match self.lookup(id).await? {
            Asset::Image(info) => Ok(info.clone()),
            Asset::Table(_) => Err(CatalogError::WrongKind {
                id: id.to_string(),
                expected: AssetKind::Image,
            }),
        }
    }
}
