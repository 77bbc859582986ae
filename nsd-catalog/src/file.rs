//! Catalog backed by a directory of exported assets.
//!
//! Layout, with `<id>` used verbatim as a relative path:
//!
//! - `<root>/<id>.geojson` or `<root>/<id>.geojson.gz` for feature collections
//! - `<root>/<id>.image.json` for image metadata ([`ImageInfo`] as JSON)

use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info};

use crate::catalog::{AssetKind, Catalog, ImageInfo};
use crate::error::{CatalogError, Result};
use crate::feature::{parse_features, Feature};

#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
}

impl FileCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Using file catalog at {}", root.display());
        FileCatalog { root }
    }

    fn asset_path(&self, id: &str, suffix: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if id.is_empty() || escapes {
            return Err(CatalogError::malformed(id, "identifier is not a relative path"));
        }
        Ok(self.root.join(format!("{}{}", id, suffix)))
    }

    async fn exists(path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn read(id: &str, path: &Path) -> Result<Vec<u8>> {
        debug!("reading {}", path.display());
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::NotFound(id.to_string()),
            _ => CatalogError::Unavailable(format!("{}: {}", path.display(), e)),
        })
    }
}

impl Catalog for FileCatalog {
    async fn describe(&self, id: &str) -> Result<AssetKind> {
        if Self::exists(&self.asset_path(id, ".geojson")?).await
            || Self::exists(&self.asset_path(id, ".geojson.gz")?).await
        {
            return Ok(AssetKind::Table);
        }
        if Self::exists(&self.asset_path(id, ".image.json")?).await {
            return Ok(AssetKind::Image);
        }
        Err(CatalogError::NotFound(id.to_string()))
    }

    async fn features(&self, id: &str) -> Result<Vec<Feature>> {
        let plain = self.asset_path(id, ".geojson")?;
        let text = if Self::exists(&plain).await {
            let bytes = Self::read(id, &plain).await?;
            String::from_utf8(bytes).map_err(|e| CatalogError::malformed(id, e))?
        } else {
            let compressed = self.asset_path(id, ".geojson.gz")?;
            if !Self::exists(&compressed).await {
                if Self::exists(&self.asset_path(id, ".image.json")?).await {
                    return Err(CatalogError::WrongKind {
                        id: id.to_string(),
                        expected: AssetKind::Table,
                    });
                }
                return Err(CatalogError::NotFound(id.to_string()));
            }
            let bytes = Self::read(id, &compressed).await?;
            let mut text = String::new();
            GzDecoder::new(bytes.as_slice())
                .read_to_string(&mut text)
                .map_err(|e| CatalogError::malformed(id, e))?;
            text
        };
        parse_features(id, &text)
    }

    async fn image(&self, id: &str) -> Result<ImageInfo> {
        let path = self.asset_path(id, ".image.json")?;
        if !Self::exists(&path).await && self.describe(id).await? == AssetKind::Table {
            return Err(CatalogError::WrongKind {
                id: id.to_string(),
                expected: AssetKind::Image,
            });
        }
        let bytes = Self::read(id, &path).await?;
        let mut info: ImageInfo =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::malformed(id, e))?;
        if info.id.is_empty() {
            info.id = id.to_string();
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const ONE_FEATURE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"area":10}}
    ]}"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nsd-file-catalog-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("ns/depressions")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_plain_and_compressed_tables() {
        let dir = scratch_dir("tables");
        std::fs::write(dir.join("ns/depressions/plain.geojson"), ONE_FEATURE).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(ONE_FEATURE.as_bytes()).unwrap();
        std::fs::write(dir.join("ns/depressions/packed.geojson.gz"), encoder.finish().unwrap()).unwrap();

        let catalog = FileCatalog::new(&dir);
        assert_eq!(catalog.describe("ns/depressions/plain").await, Ok(AssetKind::Table));
        assert_eq!(catalog.describe("ns/depressions/packed").await, Ok(AssetKind::Table));
        let plain = catalog.features("ns/depressions/plain").await.unwrap();
        let packed = catalog.features("ns/depressions/packed").await.unwrap();
        assert_eq!(plain, packed);
        assert_eq!(plain[0].get_f64("area"), Some(10.0));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_image_and_missing() {
        let dir = scratch_dir("images");
        std::fs::write(dir.join("ns/dem.image.json"), r#"{"id":"","bands":["elevation"]}"#).unwrap();

        let catalog = FileCatalog::new(&dir);
        assert_eq!(catalog.describe("ns/dem").await, Ok(AssetKind::Image));
        let info = catalog.image("ns/dem").await.unwrap();
        assert_eq!(info.id, "ns/dem");
        assert_eq!(info.bands, vec!["elevation".to_string()]);
        assert_eq!(
            catalog.features("ns/dem").await,
            Err(CatalogError::WrongKind {
                id: "ns/dem".to_string(),
                expected: AssetKind::Table
            })
        );
        assert_eq!(
            catalog.features("ns/nothing").await,
            Err(CatalogError::NotFound("ns/nothing".to_string()))
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_escaping_identifier_rejected() {
        let catalog = FileCatalog::new(std::env::temp_dir());
        assert!(matches!(
            catalog.describe("../etc/passwd").await,
            Err(CatalogError::Malformed { .. })
        ));
    }
}
