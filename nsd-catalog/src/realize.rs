use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::catalog::{AssetKind, Catalog, ImageInfo};
use crate::error::{CatalogError, Result};
use crate::expr::{CollectionExpr, Handle, ImageExpr, ImageSource};
use crate::feature::Feature;

/// Upper bound for a single realize call.
pub const DEFAULT_REALIZE_TIMEOUT: Duration = Duration::from_secs(60);

/// Evaluates lazy handles against a catalog.
///
/// Every call is bounded by `timeout`; an elapsed deadline is reported as
/// [`CatalogError::Unavailable`] so callers see one kind of transient error.
#[derive(Debug)]
pub struct Realizer<'a, C> {
    catalog: &'a C,
    timeout: Duration,
}

impl<C> Clone for Realizer<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Realizer<'_, C> {}

impl<'a, C: Catalog> Realizer<'a, C> {
    pub fn new(catalog: &'a C, timeout: Duration) -> Self {
        Realizer { catalog, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, what: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Realizing {} timed out after {:?}", what, self.timeout);
                Err(CatalogError::Unavailable(format!(
                    "{} timed out after {:?}",
                    what, self.timeout
                )))
            }
        }
    }

    /// Existence check for a single identifier.
    pub async fn fetch(&self, id: &str) -> Result<AssetKind> {
        self.bounded(id, self.catalog.describe(id)).await
    }

    async fn expect_kind(&self, id: &str, expected: AssetKind) -> Result<()> {
        let kind = self.fetch(id).await?;
        if kind != expected {
            return Err(CatalogError::WrongKind {
                id: id.to_string(),
                expected,
            });
        }
        Ok(())
    }

    /// Materialize a collection expression into features.
    pub async fn features(&self, expr: &CollectionExpr) -> Result<Vec<Feature>> {
        let source = self
            .bounded(&expr.asset, self.catalog.features(&expr.asset))
            .await?;
        let total = source.len();
        let features = expr.apply(source);
        debug!(
            "realized {}: {} of {} features after {} ops",
            expr.asset,
            features.len(),
            total,
            expr.ops.len()
        );
        Ok(features)
    }

    /// Resolve the metadata behind an image expression, checking every
    /// collection it reads from.
    pub async fn image(&self, expr: &ImageExpr) -> Result<ImageInfo> {
        for collection in expr.collections() {
            self.expect_kind(&collection.asset, AssetKind::Table).await?;
        }
        match &expr.source {
            ImageSource::Asset { id } => self.bounded(id, self.catalog.image(id)).await,
            ImageSource::Paint { collection, .. } => Ok(ImageInfo {
                id: format!("paint({})", collection.asset),
                bands: vec!["constant".to_string()],
                crs: None,
            }),
        }
    }

    /// Verify that every asset behind a handle exists with the right kind.
    pub async fn check(&self, handle: &Handle) -> Result<()> {
        match handle {
            Handle::Collection(expr) => self.expect_kind(&expr.asset, AssetKind::Table).await,
            Handle::Image(expr) => {
                if let Some(id) = expr.image_asset() {
                    self.expect_kind(id, AssetKind::Image).await?;
                }
                for collection in expr.collections() {
                    self.expect_kind(&collection.asset, AssetKind::Table).await?;
                }
                Ok(())
            }
        }
    }
}
