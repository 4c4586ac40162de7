use thiserror::Error;

/// Structural failures that end a solve.
///
/// Infeasible and unbounded problems are not errors; they are reported through
/// the status enums.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("tableau must have at least one row and one column")]
    Empty,
    #[error("expected {rows} rows of {cols} coefficients, found {found} coefficients")]
    Shape { rows: usize, cols: usize, found: usize },
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("{what} has {found} entries, expected {expected}")]
    Dimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid basis: {0}")]
    InvalidBasis(String),
    #[error("no full starting basis found")]
    NoStartingBasis,
    #[error("matrix not full rank: constraint row {row} is linearly dependent")]
    NotFullRank { row: usize },
    #[error("cannot allocate augmented tableau of {rows}x{cols}")]
    Allocation { rows: usize, cols: usize },
}
