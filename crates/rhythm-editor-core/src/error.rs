//! Error types for the editor core.
//!
//! Coordinate mismatches between the logical model and the native tree are
//! not errors: they resolve to `None` or a skipped sync. These types only
//! cover host input that cannot be represented and native calls that fail.

use thiserror::Error;

/// Error returned by a native platform call (selection read/write, range
/// construction).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Errors surfaced to the host.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// The host identifier could not be serialized into a registry key.
    #[error("identifier is not serializable: {0}")]
    IdSerialization(#[from] serde_json::Error),

    /// A native platform call failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}
