// src/parse/error.rs

use thiserror::Error;

/// Errors raised while splitting a delimited document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No data rows remain once the header row has been taken.
    #[error("document has no rows after the header row")]
    EmptyInput,
    /// A field or row delimiter was the empty string.
    #[error("{0} delimiter must not be empty")]
    EmptyDelimiter(&'static str),
}
