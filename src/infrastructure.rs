//! Infrastructure layer: HTTP session management and HTML parsing

pub mod config;
pub mod http_client;
pub mod parsing;

pub use config::{DelayPolicy, ListingSelectors, ScraperConfig};
pub use http_client::{FetchClient, FetchError, FetchSuccess};
pub use parsing::ProductListParser;
