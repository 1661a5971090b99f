use thiserror::Error;

/// Errors surfaced by fit / predict / transform calls.
///
/// Failing to converge within `max_iter` is intentionally *not* listed here:
/// a non-converged fit still yields a usable model, flagged through
/// [`StopReason::MaxIterReached`](crate::StopReason::MaxIterReached).
#[derive(Error, Debug)]
pub enum KMeansError {
    #[error("n_clusters must be a positive integer")]
    InvalidClusterCount,

    #[error("n_clusters ({n_clusters}) exceeds the number of rows ({nrows})")]
    TooManyClusters { n_clusters: usize, nrows: usize },

    #[error("n_parts must be positive when specified")]
    InvalidPartitionCount,

    #[error("shape mismatch: {nrows} rows x {ncols} cols requires {expected} values, got {actual}")]
    ShapeMismatch {
        nrows: usize,
        ncols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("dimension mismatch: model was fitted on {expected} feature columns, dataset has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Worker-side failures are fatal to the current call and never retried
    // here; retry policy belongs to the surrounding scheduling layer.
    #[error("partition {index} failed: {reason}")]
    PartitionFailure { index: usize, reason: String },

    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, KMeansError>;
