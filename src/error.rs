use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the matrix, network and gradient routines.
///
/// Every variant describes a caller mistake or an exhausted allocator; none
/// of them is retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The buffer for a `rows x cols` matrix could not be obtained.
    Allocation { rows: usize, cols: usize },
    /// Operands of `op` have incompatible shapes.
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Layer widths passed to `Network::build` are malformed.
    InvalidArchitecture(String),
    /// Finite-difference step must be finite and nonzero.
    InvalidEpsilon(f64),
    /// A dataset with zero rows has no mean cost or gradient.
    EmptyDataset,
    /// Dataset builder parameters are out of range.
    InvalidDataset(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Allocation { rows, cols } => {
                write!(f, "failed to allocate a {rows} x {cols} matrix")
            }
            Error::ShapeMismatch { op, left, right } => {
                write!(
                    f,
                    "shape mismatch in {op}: left={:?}, right={:?}",
                    left, right
                )
            }
            Error::InvalidArchitecture(reason) => {
                write!(f, "invalid architecture: {reason}")
            }
            Error::InvalidEpsilon(eps) => {
                write!(f, "finite-difference epsilon must be finite and nonzero, got {eps}")
            }
            Error::EmptyDataset => write!(f, "dataset must contain at least one row"),
            Error::InvalidDataset(reason) => write!(f, "invalid dataset: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
