//! Domain types for listing extraction

pub mod product;

pub use product::ProductRecord;
