//! The resolve → select → compose → aggregate pipeline.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use nsd_catalog::{
    BBox, Catalog, CatalogError, CollectionExpr, Realizer, DEFAULT_REALIZE_TIMEOUT,
};
use serde::Serialize;

use crate::dataset::{DatasetBundle, Selector, DEFAULT_NAMESPACE, PIPESTEM_HUC8};
use crate::error::{ExplorerError, Result};
use crate::layer::{compose, compose_overview, Composition, LayerSpec, Viewport};
use crate::location::Location;
use crate::style::{breakdown, CategoryCount};
use crate::summary::{aggregate, Summary};
use crate::table::attribute_table;
use crate::watershed::{reference_watersheds, resolve, Watershed, CONUS, WATERSHED_COLLECTION};

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Namespace of the depression, wetland and Pipestem assets.
    pub namespace: String,
    /// HUC8 code that gets the enhanced dataset bundle.
    pub reserved_huc8: String,
    /// Reference watershed boundaries.
    pub watershed_collection: String,
    /// Only watersheds intersecting this box are considered.
    pub extent: BBox,
    /// Upper bound for each realize call.
    pub realize_timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            reserved_huc8: PIPESTEM_HUC8.to_string(),
            watershed_collection: WATERSHED_COLLECTION.to_string(),
            extent: CONUS,
            realize_timeout: DEFAULT_REALIZE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayerStatus {
    Ready,
    Missing { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerReport {
    pub layer: LayerSpec,
    pub status: LayerStatus,
}

/// A dataset that could not be used; the rest of the report is still valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetIssue {
    pub dataset: String,
    pub message: String,
}

/// Everything the map and the results panel need for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location: Location,
    pub watershed: Watershed,
    pub bundle: DatasetBundle,
    pub viewport: Viewport,
    /// Bottom to top.
    pub layers: Vec<LayerReport>,
    pub wetlands: Vec<CategoryCount>,
    /// `None` when the depression dataset itself is unusable.
    pub summary: Option<Summary>,
    pub issues: Vec<DatasetIssue>,
    /// CSV of the selected watershed's attributes.
    pub watershed_table: String,
    /// CSV of the first depression's attributes.
    pub sample_table: Option<String>,
}

impl Report {
    /// Layers a renderer can draw right away.
    pub fn ready_layers(&self) -> impl Iterator<Item = &LayerSpec> {
        self.layers
            .iter()
            .filter(|l| l.status == LayerStatus::Ready)
            .map(|l| &l.layer)
    }
}

/// Errors confined to one dataset. Anything transient aborts the whole run.
fn is_dataset_error(err: &CatalogError) -> bool {
    !err.is_retryable()
}

/// Record a dataset failure once per (asset, message) pair.
fn record_issue(issues: &mut Vec<DatasetIssue>, dataset: &str, message: String) {
    if !issues
        .iter()
        .any(|i| i.dataset == dataset && i.message == message)
    {
        warn!("Skipping dataset {}: {}", dataset, message);
        issues.push(DatasetIssue {
            dataset: dataset.to_string(),
            message,
        });
    }
}

pub struct Explorer<C> {
    catalog: C,
    config: ExplorerConfig,
    selector: Selector,
}

impl<C: Catalog> Explorer<C> {
    pub fn new(catalog: C, config: ExplorerConfig) -> Self {
        let selector = Selector::new(&config.namespace, &config.reserved_huc8);
        Explorer {
            catalog,
            config,
            selector,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn realizer(&self) -> Realizer<'_, C> {
        Realizer::new(&self.catalog, self.config.realize_timeout)
    }

    pub fn watersheds(&self) -> CollectionExpr {
        reference_watersheds(&self.config.watershed_collection, self.config.extent)
    }

    /// Selection map layers.
    pub fn overview(&self) -> Composition {
        compose_overview(self.selector.namespace(), &self.watersheds())
    }

    pub async fn resolve(&self, location: Location) -> Result<Watershed> {
        resolve(&self.realizer(), &self.watersheds(), location).await
    }

    /// Run the full pipeline for one location.
    ///
    /// `NoMatch` and transient catalog failures abort the run. A missing or
    /// malformed dataset only disables the layers and statistics built on it.
    pub async fn explore(&self, location: Location) -> Result<Report> {
        let realizer = self.realizer();
        let watershed = self.resolve(location).await?;
        let bundle = self.selector.select(&watershed.huc8);
        if bundle.is_enhanced() {
            info!("HUC8 {} has the enhanced LiDAR bundle", watershed.huc8);
        }
        let composition = compose(&bundle, &watershed);
        let mut issues: Vec<DatasetIssue> = Vec::new();

        let mut layers = Vec::with_capacity(composition.layers.len());
        for layer in composition.layers {
            let status = match realizer.check(&layer.data).await {
                Ok(()) => LayerStatus::Ready,
                Err(e) if is_dataset_error(&e) => {
                    let dataset = match e.asset_id() {
                        Some(id) => id.to_string(),
                        None => layer.data.asset_ids().join(", "),
                    };
                    record_issue(&mut issues, &dataset, e.to_string());
                    LayerStatus::Missing {
                        reason: e.to_string(),
                    }
                }
                Err(e) => return Err(e.into()),
            };
            layers.push(LayerReport { layer, status });
        }

        let generic = bundle.generic();
        let wetlands = match realizer
            .features(&CollectionExpr::asset(&generic.wetlands))
            .await
        {
            Ok(features) => breakdown(&features),
            Err(e) if is_dataset_error(&e) => {
                record_issue(&mut issues, &generic.wetlands, e.to_string());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let (summary, sample_table) = match realizer
            .features(&CollectionExpr::asset(&generic.depressions))
            .await
        {
            Ok(depressions) => match aggregate(&watershed, &depressions) {
                Ok(summary) => {
                    let sample_table = match depressions.first() {
                        Some(first) => Some(attribute_table(std::slice::from_ref(first))?),
                        None => None,
                    };
                    (Some(summary), sample_table)
                }
                Err(e @ ExplorerError::InvalidAttribute { .. }) => {
                    record_issue(&mut issues, &generic.depressions, e.to_string());
                    (None, None)
                }
                Err(e) => return Err(e),
            },
            Err(e) if is_dataset_error(&e) => {
                record_issue(&mut issues, &generic.depressions, e.to_string());
                (None, None)
            }
            Err(e) => return Err(e.into()),
        };

        let watershed_table = attribute_table(std::slice::from_ref(&watershed.feature))?;
        Ok(Report {
            location,
            watershed,
            bundle,
            viewport: composition.viewport,
            layers,
            wetlands,
            summary,
            issues,
            watershed_table,
            sample_table,
        })
    }
}

/// The current selection of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub report: Report,
    pub resolved_at: DateTime<Utc>,
}

/// Per-user state: the last submitted location and what it resolved to.
///
/// Each submission re-runs the whole pipeline; state changes only once the
/// run has finished, so a selection never mixes results of two locations.
#[derive(Debug, Clone, Default)]
pub struct Session {
    location: Location,
    selection: Option<Selection>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replace the session state with the result for `location`.
    ///
    /// On failure the previous selection is dropped, since it no longer
    /// matches the submitted location.
    pub async fn submit<C: Catalog>(
        &mut self,
        explorer: &Explorer<C>,
        location: Location,
    ) -> Result<&Selection> {
        let outcome = explorer.explore(location).await;
        self.location = location;
        match outcome {
            Ok(report) => {
                let selection: &Selection = self.selection.insert(Selection {
                    report,
                    resolved_at: Utc::now(),
                });
                Ok(selection)
            }
            Err(e) => {
                self.selection = None;
                Err(e)
            }
        }
    }
}
