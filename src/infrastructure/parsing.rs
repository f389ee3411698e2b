//! HTML parsing infrastructure for listing pages
//!
//! Priority-ordered selector chains with per-fragment error recovery: a
//! single malformed product fragment must never abort the whole pass.

pub mod error;
pub mod product_list_parser;

pub use error::{ParsingError, ParsingResult};
pub use product_list_parser::ProductListParser;
