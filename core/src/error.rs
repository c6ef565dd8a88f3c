use crate::periodic_table::ElementType;

/// Everything that can go wrong while preparing a wave function input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// a matrix file contained a token that is not a number of the
    /// expected kind
    #[error("malformed token {token:?} on line {line}: {reason}")]
    MalformedToken {
        line: usize,
        token: String,
        reason: String,
    },

    /// a matrix file row had the wrong number of entries
    #[error("row {row} has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// a matrix file had the wrong number of rows
    #[error("found {found} rows, expected {expected}")]
    RowCount { found: usize, expected: usize },

    /// the basis set has no functions for an element of the molecule
    #[error("basis set defines no functions for element {0:?}")]
    MissingElementBasis(ElementType),

    /// the basis set description could not be interpreted
    #[error("invalid basis set: {0}")]
    BasisSet(String),

    /// the self consistent field iteration ran out of iterations
    #[error("scf did not converge within {max_iterations} iterations")]
    ScfNotConverged { max_iterations: usize },

    /// matrix dimensions do not line up for the requested operation
    #[error("dimension mismatch: {0}")]
    Dimension(String),
}
