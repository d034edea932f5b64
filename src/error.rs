use thiserror::Error;

/// Errors raised by the path accessors. Building never fails: malformed
/// keys degrade to the last-applied shape instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The path string was rejected by strict parsing.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        path: String,
        reason: &'static str,
    },

    /// The structure handed to an accessor was null.
    #[error("target structure is null")]
    InvalidTarget,
}

impl Error {
    pub(crate) fn invalid_path(path: &str, reason: &'static str) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }

    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::InvalidPath { .. })
    }

    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Error::InvalidTarget)
    }
}
