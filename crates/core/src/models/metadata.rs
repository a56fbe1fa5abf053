use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often a stock pays its dividend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutFrequency {
    Monthly,
    Quarterly,
    Annually,
}

impl std::fmt::Display for PayoutFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutFrequency::Monthly => write!(f, "Monthly"),
            PayoutFrequency::Quarterly => write!(f, "Quarterly"),
            PayoutFrequency::Annually => write!(f, "Annually"),
        }
    }
}

impl PayoutFrequency {
    /// Parse a frequency string case-insensitively. Returns `None` for
    /// anything outside the three supported values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Some(PayoutFrequency::Monthly),
            "quarterly" => Some(PayoutFrequency::Quarterly),
            "annually" | "annual" | "yearly" => Some(PayoutFrequency::Annually),
            _ => None,
        }
    }
}

/// A web source cited by the metadata provider for its figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub title: String,
    pub uri: String,
}

/// Descriptive dividend data for one ticker, as resolved by the
/// metadata provider.
///
/// Entries are replaced wholesale on a successful fetch — never
/// partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendMetadata {
    /// Ticker symbol, uppercased
    pub ticker: String,

    /// Company / fund name (e.g., "Realty Income Corporation")
    pub name: String,

    /// Current share price (≥ 0)
    pub current_price: f64,

    /// Trailing dividend yield, in percent
    pub yield_pct: f64,

    /// Total dividend paid per share per year (≥ 0)
    pub annual_dividend_per_share: f64,

    /// Historical dividend growth rate, in percent per year
    pub growth_rate_pct: f64,

    /// Payment cadence
    pub payout_frequency: PayoutFrequency,

    /// When this entry was fetched
    pub last_updated: DateTime<Utc>,

    /// Web sources backing the figures, deduplicated by URI
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
}

/// Local cache of fetched dividend metadata, keyed by uppercase ticker.
///
/// Invariant: at most one entry per ticker. Inserting for an existing
/// ticker replaces the whole entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataCache {
    pub entries: HashMap<String, DividendMetadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for a ticker. The key is normalized
    /// to uppercase so lookups are case-insensitive.
    pub fn insert(&mut self, ticker: &str, data: DividendMetadata) {
        self.entries.insert(ticker.trim().to_uppercase(), data);
    }

    /// Look up metadata for a ticker. Returns `None` when not cached —
    /// never errors.
    pub fn lookup(&self, ticker: &str) -> Option<&DividendMetadata> {
        self.entries.get(&ticker.trim().to_uppercase())
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries.contains_key(&ticker.trim().to_uppercase())
    }

    /// Remove the entry for a ticker. Returns the removed entry, if any.
    pub fn remove(&mut self, ticker: &str) -> Option<DividendMetadata> {
        self.entries.remove(&ticker.trim().to_uppercase())
    }

    /// Number of cached tickers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All cached tickers in deterministic (sorted) order.
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.entries.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Arithmetic mean of `growth_rate_pct` across all entries.
    /// Returns `None` when the cache is empty.
    pub fn average_growth_rate_pct(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.values().map(|m| m.growth_rate_pct).sum();
        Some(sum / self.entries.len() as f64)
    }

    /// Remove all entries fetched before `cutoff`.
    /// Returns the number of entries removed.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, m| m.last_updated >= cutoff);
        before - self.entries.len()
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Drop duplicate citations, keeping the first occurrence of each URI.
/// Order is otherwise preserved.
pub fn dedup_sources(sources: Vec<SourceCitation>) -> Vec<SourceCitation> {
    let mut seen = std::collections::HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}
