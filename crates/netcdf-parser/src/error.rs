//! Error types for NetCDF reading and writing.

use mask_common::MaskError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by libnetcdf
    #[error("NetCDF library error: {0}")]
    Library(#[from] netcdf::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<NetCdfError> for MaskError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => MaskError::Io(e),
            NetCdfError::MissingData(msg) => MaskError::MissingData(msg),
            other => MaskError::NetCdf(other.to_string()),
        }
    }
}
