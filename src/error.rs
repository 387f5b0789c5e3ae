use thiserror::Error;

/// Error types for the streamcluster library
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A configuration value is invalid, or the requested cluster count
    /// cannot be produced from the current structure
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The index holds no non-empty nodes
    #[error("Empty structure: {0}")]
    EmptyStructure(String),

    /// Dimension mismatch between a point and the index
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}
