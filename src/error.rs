use thiserror::Error;

/// Error type for this crate.
///
/// # Example
///
/// A matrix of dimension zero cannot be allocated:
///
/// ```
/// let mut m = pose_matrix::SquareMatrix::new();
/// assert!(matches!(
///     m.set_dimension(0),
///     Err(pose_matrix::MatrixError::ZeroDimension)
/// ));
/// assert_eq!(m.dimension(), 0);
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MatrixError {
    /// A matrix of dimension zero was requested.
    #[error("cannot allocate a matrix of dimension 0")]
    ZeroDimension,
    /// The backing buffer could not be obtained.
    #[error("cannot allocate storage for a {dimension}x{dimension} matrix")]
    AllocationFailure {
        /// The requested dimension.
        dimension: usize,
    },
    /// The operation requires an allocated matrix.
    #[error("matrix is unallocated")]
    Unallocated,
    /// An exact-zero pivot was met during factorization.
    /// The matrix is left partially factored.
    #[error("singular pivot at row {index}")]
    SingularPivot {
        /// Logical row of the zero pivot.
        index: usize,
    },
    /// A slice length disagrees with the matrix dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The matrix dimension.
        expected: usize,
        /// The offending length.
        got: usize,
    },
    /// A row of a matrix built from rows has the wrong length.
    #[error("row {row} has {got} entries, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// The number of rows.
        expected: usize,
        /// The length of the offending row.
        got: usize,
    },
    /// Errors related to linear system documents.
    #[error("{0}")]
    SystemError(String),
    #[error(transparent)]
    /// Errors coming from `serde_yaml`.
    YamlError(#[from] serde_yaml::Error),
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    #[error(transparent)]
    /// Errors coming from `serde_json`.
    JsonError(#[from] serde_json::Error),
}
