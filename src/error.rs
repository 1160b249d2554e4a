// src/error.rs

//! Central error type for the apogee library

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for library consumers
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or validating a design document failed
    #[error(transparent)]
    Document(#[from] crate::design::DocumentError),

    /// RockSim conversion or serialization failed
    #[error(transparent)]
    Export(#[from] crate::rocksim::ExportError),

    /// I/O outside the exporter (reading design files, writing output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
