// Error taxonomy for document processing

use thiserror::Error;

/// Errors raised while turning one input document into render calls.
///
/// Every variant is scoped to the document that produced it; the runtime
/// reports it and moves on to the next document.
#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    /// Malformed delimited text
    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// A present field that is not a number
    #[error("cannot convert '{value}' to a number (series {series}, position {position})")]
    Coercion {
        series: usize,
        position: usize,
        value: String,
    },

    /// The command needs a series the data does not supply
    #[error("{0}")]
    Usage(String),

    /// Conflicting or invalid options
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Nothing left after blank-row removal
    #[error("input document contains no data")]
    EmptyDocument,
}

impl PlotError {
    pub fn usage(message: impl Into<String>) -> Self {
        PlotError::Usage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        PlotError::Config(message.into())
    }
}
