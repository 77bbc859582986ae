//! Client for a read-only geospatial catalog.
//!
//! Assets are addressed by string identifiers such as
//! `users/giswqs/depressions/10160002`. Handles returned here are lazy
//! expressions; a [`Realizer`] is the only thing that talks to a backend.

pub mod catalog;
pub mod error;
pub mod expr;
pub mod feature;
pub mod file;
#[cfg(feature = "api")]
pub mod http;
pub mod realize;

pub use catalog::{AssetKind, Catalog, ImageInfo, MemoryCatalog};
pub use error::{CatalogError, Result};
pub use expr::{BBox, CollectionExpr, CollectionOp, Handle, ImageExpr, ImageOp, ImageSource};
pub use feature::{parse_features, Feature, Properties};
pub use file::FileCatalog;
#[cfg(feature = "api")]
pub use http::HttpCatalog;
pub use realize::{Realizer, DEFAULT_REALIZE_TIMEOUT};
