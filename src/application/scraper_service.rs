//! Scraping pipeline orchestration
//!
//! Wires the fetcher and the extractor together: validate the URL, fetch
//! with retries, parse, extract. Fetch failures abort the pipeline before
//! any parsing; extraction never fails, so an empty record set is the
//! "fetched but found nothing" outcome, distinct from a fetch error.

use anyhow::{Context, Result};
use scraper::Html;
use tracing::info;

use crate::domain::product::ProductRecord;
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::http_client::{FetchClient, FetchError};
use crate::infrastructure::parsing::ProductListParser;

/// One scraping task: owns its HTTP session and compiled selector tables
///
/// Build a fresh instance per logical scrape; the cookie jar is not meant
/// to be shared across concurrent callers.
pub struct ScraperService {
    client: FetchClient,
    parser: ProductListParser,
}

impl ScraperService {
    /// Create a service with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a service with a custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let parser = ProductListParser::with_config(&config.selectors)
            .context("Failed to compile listing selectors")?;
        let client = FetchClient::with_config(config).context("Failed to build HTTP session")?;
        Ok(Self { client, parser })
    }

    /// Fetch one listing page and extract its records
    ///
    /// `Err` means the page could not be fetched (invalid domain, blocked,
    /// or retries exhausted). `Ok(vec![])` means the page was fetched but no
    /// valid records were found. Records keep document order; duplicates in
    /// the source markup are preserved.
    pub async fn scrape(&self, url: &str) -> Result<Vec<ProductRecord>, FetchError> {
        info!("Starting to scrape: {}", url);

        let page = self.client.fetch(url).await?;
        info!(
            "Fetched {} ({} bytes, {} attempts)",
            url,
            page.body.len(),
            page.attempts
        );

        let html = Html::parse_document(&page.body);
        let records = self.parser.extract(&html);

        info!("Found {} valid products with both name and price", records.len());
        Ok(records)
    }
}
