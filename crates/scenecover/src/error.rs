//! Error types for polygon construction and model loading.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised when a geometric or catalog value cannot be constructed.
///
/// Search outcomes (infeasible target, deadline expiry) are not errors; they
/// are reported through `optimize::Status`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// A ring needs at least three distinct vertices.
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    /// A coordinate was NaN or infinite.
    #[error("polygon vertex {index} is not finite")]
    NonFinite { index: usize },

    /// Polygon text was not of the form `[[x,y],[x,y],...]`.
    #[error("cannot parse polygon text: {0}")]
    Parse(String),

    /// Prices must be finite and non-negative.
    #[error("invalid price {0}")]
    InvalidPrice(f64),

    /// Grid granularity must be finite and strictly positive.
    #[error("invalid grid delta {0}")]
    InvalidDelta(f64),
}
