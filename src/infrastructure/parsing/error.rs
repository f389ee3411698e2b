//! Parsing error types
//!
//! These only surface at parser construction time: an extraction pass over a
//! document is infallible, and an empty result is a legitimate outcome.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No valid selectors compiled for '{group}'. Errors: {}", .errors.join(", "))]
    NoValidSelectors { group: String, errors: Vec<String> },

    #[error("Invalid price pattern: {pattern} - {reason}")]
    InvalidPricePattern { pattern: String, reason: String },
}

pub type ParsingResult<T> = Result<T, ParsingError>;
