//! Scraper configuration: retry budget, timing policy, and CSS selector tables
//!
//! Centralized configuration so the selector tables can be overridden from a
//! serialized form without touching the parsing code.

use serde::{Deserialize, Serialize};

/// Top-level configuration for one scraping task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Domain marker the target URL's host must contain
    pub allowed_domain: String,

    /// Site root used for the warm-up request and for Referer/Origin headers
    pub base_url: String,

    /// Maximum number of fetch attempts (>= 1)
    pub max_retries: u32,

    /// Per-attempt request timeout in seconds
    pub timeout_seconds: u64,

    /// Whether to visit the site root once before fetching, to pick up
    /// session cookies. Failure of the warm-up request is never fatal.
    pub warm_up: bool,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Jittered delay ranges, escalated by failure class
    pub delays: DelayPolicy,

    /// Selector tables for listing extraction
    pub selectors: ListingSelectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            allowed_domain: "amazon.in".to_string(),
            base_url: "https://www.amazon.in/".to_string(),
            max_retries: 3,
            timeout_seconds: 20,
            warm_up: true,
            follow_redirects: true,
            delays: DelayPolicy::default(),
            selectors: ListingSelectors::default(),
        }
    }
}

/// Randomized delay ranges in milliseconds, one per failure class
///
/// Escalation order reflects how risky continued probing is: a detected
/// block or an explicit rate-limit signal gets a longer pause than a
/// generic 503 or a transport error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayPolicy {
    /// Before every request, to avoid request-pattern fingerprinting
    pub pre_request_ms: (u64, u64),
    /// After the warm-up request
    pub warm_up_ms: (u64, u64),
    /// After a 200 response carrying a blocking indicator
    pub block_backoff_ms: (u64, u64),
    /// After HTTP 503
    pub unavailable_backoff_ms: (u64, u64),
    /// After HTTP 429
    pub rate_limit_backoff_ms: (u64, u64),
    /// After a transport-level error (timeout, reset, DNS)
    pub transport_backoff_ms: (u64, u64),
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            pre_request_ms: (2_000, 5_000),
            warm_up_ms: (1_000, 2_000),
            block_backoff_ms: (5_000, 10_000),
            unavailable_backoff_ms: (5_000, 10_000),
            rate_limit_backoff_ms: (10_000, 20_000),
            transport_backoff_ms: (3_000, 8_000),
        }
    }
}

impl DelayPolicy {
    /// All-zero policy for deterministic tests
    pub fn none() -> Self {
        Self {
            pre_request_ms: (0, 0),
            warm_up_ms: (0, 0),
            block_backoff_ms: (0, 0),
            unavailable_backoff_ms: (0, 0),
            rate_limit_backoff_ms: (0, 0),
            transport_backoff_ms: (0, 0),
        }
    }
}

/// CSS selector tables for listing pages - multiple fallbacks per field
///
/// The site serves structurally different markup across search results,
/// category pages, and grid layouts, so every field carries a priority-
/// ordered chain from most specific to most generic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Selectors for product item containers
    pub product_container: Vec<String>,

    /// Selectors for the display name within a container
    pub name: Vec<String>,

    /// Selectors for the price within a container
    pub price: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_container: vec![
                // Search results page - most common
                "[data-component-type=\"s-search-result\"]".to_string(),
                ".s-result-item[data-asin]".to_string(),
                ".s-widget-container[data-asin]".to_string(),
                // Category pages
                ".s-result-item".to_string(),
                // Product grid variations
                ".sg-col-inner .s-widget-container".to_string(),
                // Fallback selectors
                "[data-asin]:not([data-asin=\"\"])".to_string(),
                ".s-item-container".to_string(),
                ".celwidget[data-asin]".to_string(),
            ],
            name: vec![
                "h2 a span".to_string(),
                "h2 span".to_string(),
                "h3 a span".to_string(),
                "h3 span".to_string(),
                ".s-size-mini .s-link-style a span".to_string(),
                "[data-cy=\"title-recipe-title\"]".to_string(),
                ".a-size-base-plus".to_string(),
                ".a-size-base".to_string(),
                ".a-size-medium".to_string(),
                ".a-size-small".to_string(),
                "a .a-text-normal".to_string(),
                ".a-link-normal span".to_string(),
                ".s-link-style a span".to_string(),
                ".a-color-base".to_string(),
                "[data-asin] h2 span".to_string(),
                "[data-asin] h3 span".to_string(),
            ],
            price: vec![
                ".a-price .a-offscreen".to_string(),
                ".a-price-whole".to_string(),
                ".a-price-symbol + .a-price-whole".to_string(),
                ".a-price-range .a-price .a-offscreen".to_string(),
                ".a-text-price .a-offscreen".to_string(),
                ".a-color-price".to_string(),
                "[data-a-color=\"price\"] .a-offscreen".to_string(),
                ".a-price .a-price-whole".to_string(),
                ".a-text-price".to_string(),
                ".a-price-symbol".to_string(),
                ".sx-price .a-price .a-offscreen".to_string(),
                ".a-price.a-text-price .a-offscreen".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_budget() {
        let config = ScraperConfig::default();
        assert!(config.max_retries >= 1);
        assert!(config.timeout_seconds >= 15);
        assert_eq!(config.allowed_domain, "amazon.in");
    }

    #[test]
    fn selector_tables_are_ordered_most_specific_first() {
        let selectors = ListingSelectors::default();
        assert_eq!(
            selectors.product_container[0],
            "[data-component-type=\"s-search-result\"]"
        );
        assert_eq!(selectors.price[0], ".a-price .a-offscreen");
        assert!(!selectors.name.is_empty());
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = ScraperConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScraperConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_retries, config.max_retries);
        assert_eq!(back.selectors.price.len(), config.selectors.price.len());
    }
}
