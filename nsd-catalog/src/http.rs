//! Remote catalog over HTTP.
//!
//! - `GET {base}/assets/{id}` answers `{"kind": "table" | "image", ...}`
//! - `GET {base}/assets/{id}/features` answers a GeoJSON FeatureCollection
//!
//! A 404 maps to [`CatalogError::NotFound`]; every other failure is
//! [`CatalogError::Unavailable`]. Nothing is retried here: re-running the
//! pipeline is the retry.

use std::time::Duration;

use log::{info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::catalog::{AssetKind, Catalog, ImageInfo};
use crate::error::{CatalogError, Result};
use crate::feature::{parse_features, Feature};

#[derive(Debug, Deserialize)]
struct AssetDescription {
    kind: AssetKind,
    #[serde(default)]
    bands: Vec<String>,
    #[serde(default)]
    crs: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        info!("Using remote catalog at {}", base_url);
        Ok(HttpCatalog {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn asset_url(&self, id: &str) -> String {
        format!("{}/assets/{}", self.base_url, id.trim_start_matches('/'))
    }

    async fn get(&self, id: &str, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Request failed for {}: {}", id, e);
            CatalogError::Unavailable(e.to_string())
        })?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(id.to_string())),
            status if status.is_success() => Ok(response),
            status => {
                warn!("Bad response status for {}: {}", id, status);
                Err(CatalogError::Unavailable(format!("{} answered {}", url, status)))
            }
        }
    }

    async fn description(&self, id: &str) -> Result<AssetDescription> {
        let response = self.get(id, &self.asset_url(id)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::malformed(id, e))
    }
}

impl Catalog for HttpCatalog {
    async fn describe(&self, id: &str) -> Result<AssetKind> {
        Ok(self.description(id).await?.kind)
    }

    async fn features(&self, id: &str) -> Result<Vec<Feature>> {
        let url = format!("{}/features", self.asset_url(id));
        let response = self.get(id, &url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        parse_features(id, &body)
    }

    async fn image(&self, id: &str) -> Result<ImageInfo> {
        let description = self.description(id).await?;
        if description.kind != AssetKind::Image {
            return Err(CatalogError::WrongKind {
                id: id.to_string(),
                expected: AssetKind::Image,
            });
        }
        Ok(ImageInfo {
            id: id.to_string(),
            bands: description.bands,
            crs: description.crs,
        })
    }
}
