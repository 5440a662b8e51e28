use thiserror::Error;

/// Fatal catalogue load failures.
///
/// Any of these aborts the load; no partial catalogue is returned.
/// Malformed numeric cells and duplicate codes are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Source has no non-blank lines
    #[error("catalogue source is empty")]
    EmptySource,

    /// Header has the wrong number of columns
    #[error("header has {found} columns, expected {expected}")]
    HeaderShapeMismatch { expected: usize, found: usize },

    /// Data row has the wrong number of columns (1-based line number)
    #[error("line {line}: row has {found} columns, expected {expected}")]
    RowShapeMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Row has an empty ISO code after normalization (1-based line number)
    #[error("line {line}: missing ISO code")]
    MissingIdentifier { line: usize },
}
