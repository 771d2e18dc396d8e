use thiserror::Error;

/// Errors surfaced by the assimilation core and its drivers.
///
/// Numeric degeneracies (zero denominators, non-finite intermediate values) are
/// not errors: they are either substituted or propagated as values.
#[derive(Debug, Error)]
pub enum AssimilationError {
    /// A "latest" accessor was called before any observation was recorded.
    #[error("no {what} recorded yet")]
    EmptyHistory { what: &'static str },

    #[error("series length mismatch: source1 has {left} observations, source2 has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid sample settings: {0}")]
    InvalidSample(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssimilationError {
    pub(crate) fn empty(what: &'static str) -> Self {
        Self::EmptyHistory { what }
    }
}
