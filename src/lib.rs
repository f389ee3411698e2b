//! Listing Harvester - resilient Amazon.in listing scraper
//!
//! Fetches a product listing page while evading basic anti-automation
//! defenses, then extracts ordered (name, price) records from markup whose
//! layout varies between page templates.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the public surface for easier access
pub use application::scraper_service::ScraperService;
pub use domain::product::ProductRecord;
pub use infrastructure::config::{DelayPolicy, ListingSelectors, ScraperConfig};
pub use infrastructure::http_client::{FetchClient, FetchError, FetchSuccess};
pub use infrastructure::parsing::ProductListParser;
