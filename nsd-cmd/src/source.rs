//! Catalog selection from command line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use nsd_catalog::{AssetKind, Catalog, Feature, FileCatalog, HttpCatalog, ImageInfo};
use nsd_data::dataset::{DEFAULT_NAMESPACE, PIPESTEM_HUC8};
use nsd_data::ExplorerConfig;

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Directory of exported assets (`<id>.geojson[.gz]`, `<id>.image.json`)
    #[arg(long, global = true, conflicts_with = "catalog_url")]
    pub catalog_dir: Option<PathBuf>,

    /// Base URL of a remote catalog service
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Seconds before a catalog request is abandoned
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Namespace of the depression and wetland assets
    #[arg(long, global = true, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// HUC8 code with the enhanced LiDAR bundle
    #[arg(long, global = true, default_value = PIPESTEM_HUC8)]
    pub reserved_huc8: String,
}

impl CatalogArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn config(&self) -> anyhow::Result<ExplorerConfig> {
        Ok(ExplorerConfig {
            namespace: self.namespace.clone(),
            reserved_huc8: nsd_utils::huc::parse_huc8(&self.reserved_huc8)?,
            realize_timeout: self.timeout(),
            ..ExplorerConfig::default()
        })
    }

    pub fn open(&self) -> anyhow::Result<AnyCatalog> {
        match (&self.catalog_dir, &self.catalog_url) {
            (Some(dir), _) => Ok(AnyCatalog::File(FileCatalog::new(dir))),
            (None, Some(url)) => Ok(AnyCatalog::Http(HttpCatalog::new(url, self.timeout())?)),
            (None, None) => anyhow::bail!("Pass --catalog-dir or --catalog-url"),
        }
    }
}

/// Whichever backend the flags asked for.
#[derive(Debug, Clone)]
pub enum AnyCatalog {
    File(FileCatalog),
    Http(HttpCatalog),
}

impl Catalog for AnyCatalog {
    async fn describe(&self, id: &str) -> nsd_catalog::Result<AssetKind> {
        match self {
            AnyCatalog::File(c) => c.describe(id).await,
            AnyCatalog::Http(c) => c.describe(id).await,
        }
    }

    async fn features(&self, id: &str) -> nsd_catalog::Result<Vec<Feature>> {
        match self {
            AnyCatalog::File(c) => c.features(id).await,
            AnyCatalog::Http(c) => c.features(id).await,
        }
    }

    async fn image(&self, id: &str) -> nsd_catalog::Result<ImageInfo> {
        match self {
            AnyCatalog::File(c) => c.image(id).await,
            AnyCatalog::Http(c) => c.image(id).await,
        }
    }
}
