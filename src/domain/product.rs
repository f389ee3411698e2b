use serde::{Deserialize, Serialize};

/// One product record extracted from a listing page
///
/// Both fields are guaranteed non-empty by the extraction pass; the price
/// always carries the canonical "Rs" currency marker regardless of how the
/// source markup encoded the rupee sign. Records are immutable once produced
/// and surface to the caller in document order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}
