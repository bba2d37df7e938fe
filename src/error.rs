/// Errors reported at the conversion boundary
use std::str::Utf8Error;

/// Markdown itself never fails to convert; these are resource guards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Blockquotes, list items, link text or emphasis nested past the limit
    #[error("nesting depth exceeded the limit of {limit}")]
    NestingTooDeep { limit: usize },

    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] Utf8Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
