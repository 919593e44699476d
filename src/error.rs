//! Error types for nvsgen
//!
//! Provides a unified error type for all operations.
//!
//! `PageFull` and `InsufficientSize` double as control-flow signals: the
//! partition builder matches on them to retry on a fresh page or to stop
//! allocating pages. Every other variant aborts generation.

use thiserror::Error;

/// Result type alias using NvsError
pub type Result<T> = std::result::Result<T, NvsError>;

/// Unified error type for nvsgen operations
#[derive(Debug, Error)]
pub enum NvsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Page Allocation
    // -------------------------------------------------------------------------
    /// Current page has no room left for the entry
    #[error("Page is full")]
    PageFull,

    /// Partition budget exhausted
    #[error("Size parameter is less than the size of data in the declaration table, increase the partition size")]
    InsufficientSize,

    /// A write ran past the last entry slot of a page
    #[error("Page overflow: {0}")]
    PageOverflow(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Input error: {0}")]
    Input(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Declaration parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NvsError {
    /// True for failures the builder recovers from by allocating a page
    pub fn is_page_full(&self) -> bool {
        matches!(self, NvsError::PageFull)
    }
}
