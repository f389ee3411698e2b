//! Product list extractor with priority-ordered fallback chains
//!
//! The target site serves structurally different markup across search
//! results, category pages, and grid layouts; fields may be absent or styled
//! differently per listing. Every field therefore walks an ordered selector
//! chain and takes the first usable match, with a regex sweep as the final
//! fallback for prices.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::error::{ParsingError, ParsingResult};
use crate::domain::product::ProductRecord;
use crate::infrastructure::config::ListingSelectors;

/// Fragments whose visible text is this short are empty placeholder nodes
const MIN_FRAGMENT_TEXT_LEN: usize = 20;

/// Names this short (or purely numeric) are page furniture like rank badges
const MIN_NAME_LEN: usize = 5;

/// Indian-currency numeric patterns for the price fallback sweep, in
/// priority order: symbol-prefixed, then "Rs"-prefixed, then "INR"-prefixed.
const PRICE_PATTERNS: [&str; 3] = [
    r"₹\s*[\d,]+(?:\.\d{2})?",
    r"Rs\.?\s*[\d,]+(?:\.\d{2})?",
    r"INR\s*[\d,]+(?:\.\d{2})?",
];

/// Parser for extracting (name, price) records from listing pages
#[derive(Debug)]
pub struct ProductListParser {
    container_selectors: Vec<Selector>,
    name_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    price_patterns: Vec<Regex>,
}

impl ProductListParser {
    /// Create a parser with the default selector tables
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create a parser with custom selector tables
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container_selectors: Self::compile_selectors(
                &selectors.product_container,
                "product_container",
            )?,
            name_selectors: Self::compile_selectors(&selectors.name, "name")?,
            price_selectors: Self::compile_selectors(&selectors.price, "price")?,
            price_patterns: Self::compile_price_patterns()?,
        })
    }

    /// Compile selector strings, skipping invalid entries with a warning
    fn compile_selectors(selector_strings: &[String], group: &str) -> ParsingResult<Vec<Selector>> {
        let mut selectors = Vec::new();
        let mut errors = Vec::new();

        for selector_str in selector_strings {
            match Selector::parse(selector_str) {
                Ok(selector) => selectors.push(selector),
                Err(e) => {
                    warn!("Failed to compile selector '{}': {}", selector_str, e);
                    errors.push(format!("'{selector_str}': {e}"));
                }
            }
        }

        if selectors.is_empty() {
            return Err(ParsingError::NoValidSelectors {
                group: group.to_string(),
                errors,
            });
        }

        Ok(selectors)
    }

    fn compile_price_patterns() -> ParsingResult<Vec<Regex>> {
        PRICE_PATTERNS
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ParsingError::InvalidPricePattern {
                    pattern: (*pattern).to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Extract all valid records from a parsed document, in document order
    ///
    /// Duplicates in the source markup produce duplicate records; fragments
    /// missing either field are dropped silently. An empty vec means "no
    /// products found", which is a valid outcome, not an error.
    pub fn extract(&self, html: &Html) -> Vec<ProductRecord> {
        let fragments = self.discover_fragments(html);
        if fragments.is_empty() {
            warn!("No product fragments found with any container selector");
            return Vec::new();
        }

        let mut records = Vec::new();
        for (index, fragment) in fragments.iter().enumerate() {
            match self.extract_record(fragment) {
                Some(record) => records.push(record),
                None => {
                    debug!("Dropping fragment {} with incomplete name/price", index);
                }
            }
        }

        info!("Extracted {} valid records from {} fragments", records.len(), fragments.len());
        records
    }

    /// Stage 1: locate item fragments via the container selector chain
    ///
    /// The first selector yielding at least one fragment with meaningful
    /// visible text wins; later selectors are never consulted.
    fn discover_fragments<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        for (i, selector) in self.container_selectors.iter().enumerate() {
            let qualifying: Vec<ElementRef<'a>> = html
                .select(selector)
                .filter(|element| visible_text(element).len() > MIN_FRAGMENT_TEXT_LEN)
                .collect();

            if !qualifying.is_empty() {
                debug!(
                    "Found {} product fragments using container selector #{}",
                    qualifying.len(),
                    i
                );
                return qualifying;
            }
        }
        Vec::new()
    }

    /// Stage 2: pull name and price out of one fragment independently
    fn extract_record(&self, fragment: &ElementRef) -> Option<ProductRecord> {
        let name = self.extract_name(fragment)?;
        let price = self
            .extract_price(fragment)
            .or_else(|| self.price_from_raw_text(fragment))?;
        Some(ProductRecord { name, price })
    }

    /// Walk the name selector chain; accept the first match that is long
    /// enough and not purely numeric.
    fn extract_name(&self, fragment: &ElementRef) -> Option<String> {
        for selector in &self.name_selectors {
            if let Some(element) = fragment.select(selector).next() {
                let text = visible_text(&element);
                if text.len() > MIN_NAME_LEN && !text.chars().all(|c| c.is_ascii_digit()) {
                    return Some(text);
                }
            }
        }
        None
    }

    /// Walk the price selector chain; accept the first match that carries a
    /// currency mark or digit, then normalize it.
    fn extract_price(&self, fragment: &ElementRef) -> Option<String> {
        for selector in &self.price_selectors {
            if let Some(element) = fragment.select(selector).next() {
                let text = visible_text(&element);
                if text.is_empty() {
                    continue;
                }
                let looks_like_price = text.contains('₹')
                    || text.to_uppercase().contains("RS")
                    || text.chars().any(|c| c.is_ascii_digit());
                if looks_like_price {
                    if let Some(price) = normalize_price(&text) {
                        return Some(price);
                    }
                }
            }
        }
        None
    }

    /// Fallback: sweep the fragment's full text for currency patterns
    fn price_from_raw_text(&self, fragment: &ElementRef) -> Option<String> {
        let all_text: String = fragment.text().collect();
        for pattern in &self.price_patterns {
            if let Some(found) = pattern.find(&all_text) {
                if let Some(price) = normalize_price(found.as_str()) {
                    return Some(price);
                }
            }
        }
        None
    }
}

/// Collapse an element's text nodes into single-space-separated visible text
fn visible_text(element: &ElementRef) -> String {
    let text: String = element.text().collect();
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a raw price string into the canonical "Rs"-marked form
///
/// Handles the rupee sign proper, its cp1252 mojibake rendering ("â‚¹"),
/// the "INR" spelling, and NBSP padding. Returns None when no digit
/// survives, so callers can fall through to the next strategy.
fn normalize_price(raw: &str) -> Option<String> {
    let cleaned = raw.replace('\u{a0}', " ");
    let cleaned = cleaned.replace("â‚¹", "Rs ");
    let cleaned = cleaned.replace('₹', "Rs ").replace('â', "Rs ");
    let cleaned = cleaned.replace("INR", "Rs");
    let cleaned = collapse_whitespace(&cleaned);

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if cleaned.contains("Rs") {
        Some(cleaned)
    } else {
        Some(format!("Rs {cleaned}"))
    }
}
