/// Error types for the exploration pipeline
use nsd_catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplorerError {
    /// Catalog lookup or realize failure
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Coordinates outside the geographic range
    #[error("Invalid location ({lon}, {lat}): longitude must be in [-180, 180] and latitude in [-90, 90]")]
    InvalidLocation { lon: f64, lat: f64 },

    /// The point is not inside any reference watershed
    #[error("No watershed found at ({lon}, {lat})")]
    NoMatch { lon: f64, lat: f64 },

    /// The watershed has no depression features
    #[error("No depressions recorded for watershed {0}")]
    EmptyCollection(String),

    /// A required attribute is missing or has the wrong type
    #[error("Attribute `{attribute}` is missing or invalid in {dataset}")]
    InvalidAttribute { dataset: String, attribute: String },

    /// Attribute table export failed
    #[error("Failed to export attribute table: {0}")]
    Export(String),
}

impl ExplorerError {
    /// True for transient failures; the same location can simply be submitted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExplorerError::Catalog(e) if e.is_retryable())
    }

    pub(crate) fn invalid_attribute(dataset: &str, attribute: &str) -> Self {
        ExplorerError::InvalidAttribute {
            dataset: dataset.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// Type alias for Results using ExplorerError
pub type Result<T> = std::result::Result<T, ExplorerError>;
