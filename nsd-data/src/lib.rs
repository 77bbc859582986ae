//! Watershed-scoped surface depression explorer.
//!
//! A selected point is resolved to its HUC8 watershed, the watershed code
//! picks a dataset bundle, and the bundle is turned into map layers and
//! depression statistics.
//!
//! ```no_run
//! use nsd_catalog::FileCatalog;
//! use nsd_data::{Explorer, ExplorerConfig, Location};
//!
//! # async fn run() -> nsd_data::Result<()> {
//! let explorer = Explorer::new(FileCatalog::new("catalog"), ExplorerConfig::default());
//! let report = explorer.explore(Location::new(-99.1, 47.1)?).await?;
//! for layer in report.ready_layers() {
//!     println!("{}", layer.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod error;
pub mod explorer;
pub mod layer;
pub mod location;
pub mod style;
pub mod summary;
pub mod table;
pub mod watershed;

#[cfg(test)]
mod fixtures;

pub use dataset::{DatasetBundle, EnhancedDatasets, GenericDatasets, Selector};
pub use error::{ExplorerError, Result};
pub use explorer::{
    DatasetIssue, Explorer, ExplorerConfig, LayerReport, LayerStatus, Report, Selection, Session,
};
pub use layer::{compose, compose_overview, Composition, LayerSpec, Viewport, VisParams};
pub use location::{Location, MapClick};
pub use style::{style_for, StyleRecord, WetlandType};
pub use summary::{aggregate, Summary};
pub use table::attribute_table;
pub use watershed::{resolve, resolve_in, Watershed};
