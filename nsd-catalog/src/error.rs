/// Error types for the catalog client
use thiserror::Error;

use crate::catalog::AssetKind;

/// Main error type for catalog operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The identifier does not exist upstream
    #[error("Catalog asset not found: {0}")]
    NotFound(String),

    /// Network or service failure, including realize timeouts
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The asset exists but its payload could not be decoded
    #[error("Malformed asset {id}: {reason}")]
    Malformed { id: String, reason: String },

    /// The asset exists but is not of the requested kind
    #[error("Asset {id} is not a {expected}")]
    WrongKind { id: String, expected: AssetKind },
}

impl CatalogError {
    pub fn malformed(id: &str, reason: impl ToString) -> Self {
        CatalogError::Malformed {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Identifier of the asset at fault, if the error names one.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            CatalogError::NotFound(id)
            | CatalogError::Malformed { id, .. }
            | CatalogError::WrongKind { id, .. } => Some(id),
            CatalogError::Unavailable(_) => None,
        }
    }

    /// Transient failures may succeed if the same request is issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_))
    }
}

/// Type alias for Results using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id() {
        assert_eq!(CatalogError::NotFound("a/b".to_string()).asset_id(), Some("a/b"));
        assert_eq!(CatalogError::malformed("a/c", "bad json").asset_id(), Some("a/c"));
        assert_eq!(CatalogError::Unavailable("down".to_string()).asset_id(), None);
    }
}
