//! Error types for detmerge.

use thiserror::Error;

/// Result alias for detmerge operations.
pub type DetMergeResult<T> = std::result::Result<T, DetMergeError>;

/// Errors raised at the boundaries around the merge core.
///
/// Geometry and merging are total over their inputs and never produce one of
/// these; they come from configuration, detector sources, and image I/O.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetMergeError {
    /// A model selector named a detector that is not registered.
    #[error("unknown model: {name}")]
    UnknownModel { name: String },
    /// A configuration value is malformed.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Recorded detections could not be read or parsed.
    #[error("failed to load detection source: {reason}")]
    SourceLoad { reason: String },
    /// Image decoding, encoding, or file access failed.
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
}
