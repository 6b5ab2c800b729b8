//! Error types for annotation conversion.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Annotation conversion error types.
///
/// These are the only raising paths in the crate: a malformed path cannot be
/// recovered into safe geometry, and a mismatched property list would attach
/// metadata to the wrong marker if truncated silently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path string contained a token that does not parse as a coordinate.
    #[error("invalid path coordinate '{token}' in segment {segment}")]
    PathParse {
        /// The offending token, as seen after marker stripping.
        token: String,
        /// Zero-based index of the line segment containing it.
        segment: usize,
    },

    /// Per-box property list length does not match the box list.
    #[error("property list length {properties} does not match box count {boxes}")]
    PropertyCount {
        /// Number of bounding boxes supplied.
        boxes: usize,
        /// Number of per-box property maps supplied.
        properties: usize,
    },
}
