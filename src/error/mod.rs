use thiserror::Error;

/// Failure taxonomy of the persistence core.
///
/// Public operations return `anyhow::Result`; callers that need to branch on
/// the kind of failure recover it with `err.downcast_ref::<TopologyError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Closure invariant violated, duplicate use of a position, or a reference
    /// to a position that does not exist.
    #[error("invalid complex at position {position}: {reason}")]
    InvalidComplex { position: usize, reason: String },

    /// Malformed external input (wrong rank, wrong length, empty simplex).
    #[error("format error: {0}")]
    Format(String),

    /// A dimension outside `[0, complex.dimension()]` was requested.
    #[error("dimension {requested} requested, but the complex has dimension {available}")]
    DimensionMismatch { requested: usize, available: usize },
}

impl TopologyError {
    pub(crate) fn invalid(position: usize, reason: impl Into<String>) -> Self {
        TopologyError::InvalidComplex {
            position,
            reason: reason.into(),
        }
    }
}
