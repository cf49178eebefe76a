//! Error types for country mask generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using MaskError.
pub type MaskResult<T> = Result<T, MaskError>;

/// Primary error type for country mask operations.
#[derive(Debug, Error)]
pub enum MaskError {
    // === Input Errors ===
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Grid shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    // === Data Errors ===
    /// The configured data location exists but the expected file is not there.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The configured data location itself is not accessible.
    #[error("Data location not available: {}", .0.display())]
    DataUnavailable(PathBuf),

    #[error("Invalid boundary data: {0}")]
    Boundary(String),

    #[error("Invalid NetCDF data: {0}")]
    NetCdf(String),

    // === Output Errors ===
    #[error("Failed to persist dataset: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MaskError {
    /// True when the failure comes from an unconfigured environment
    /// (data root missing) rather than from the inputs themselves.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, MaskError::DataUnavailable(_))
    }

    /// Short stable identifier for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            MaskError::InvalidDomain(_) => "InvalidDomain",
            MaskError::InvalidConfiguration(_) => "InvalidConfiguration",
            MaskError::InvalidCoordinates(_) | MaskError::ShapeMismatch { .. } => "InvalidInput",
            MaskError::MissingData(_) | MaskError::DataUnavailable(_) => "MissingData",
            MaskError::Boundary(_) | MaskError::NetCdf(_) => "InvalidData",
            MaskError::Persistence(_) | MaskError::Io(_) => "Io",
        }
    }
}

impl From<serde_json::Error> for MaskError {
    fn from(err: serde_json::Error) -> Self {
        MaskError::Boundary(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_is_distinguishable() {
        let unavailable = MaskError::DataUnavailable(PathBuf::from("/nonexistent"));
        let missing = MaskError::MissingData("EUROPE footprint".to_string());

        assert!(unavailable.is_data_unavailable());
        assert!(!missing.is_data_unavailable());
        assert_eq!(unavailable.kind(), missing.kind());
    }

    #[test]
    fn test_error_messages() {
        let err = MaskError::ShapeMismatch {
            expected: (3, 4),
            actual: (4, 3),
        };
        assert_eq!(
            err.to_string(),
            "Grid shape mismatch: expected (3, 4), got (4, 3)"
        );
        assert_eq!(
            MaskError::InvalidDomain("MMM".to_string()).to_string(),
            "Invalid domain: MMM"
        );
    }
}
