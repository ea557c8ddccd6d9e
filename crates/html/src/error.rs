//! HTML tokenizer error types

use thiserror::Error;

/// HTML tokenizer result type
pub type HtmlResult<T> = Result<T, HtmlError>;

/// HTML tokenizer errors.
///
/// Tokenizing never fails; only configuration can be rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HtmlError {
    #[error("Unsupported tokenizer mode: {0}")]
    UnsupportedMode(String),
}
