use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sort order for holding listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingSortOrder {
    /// Alphabetical by ticker symbol
    TickerAsc,
    /// Reverse alphabetical by ticker symbol
    TickerDesc,
    /// Largest position first
    QuantityDesc,
    /// Smallest position first
    QuantityAsc,
    /// Oldest purchase first
    DateAsc,
    /// Newest purchase first (default for display)
    DateDesc,
}

/// A single stock position entered by the user.
///
/// **Important**: Holdings do NOT store price or dividend data. That is
/// fetched per ticker from the metadata provider and cached separately,
/// so a holding stays valid even when no metadata has been resolved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "SCHD", "O", "JEPI")
    pub ticker: String,

    /// Number of shares held (always positive)
    pub quantity: f64,

    /// Date the position was purchased (no time component — daily granularity)
    pub purchase_date: NaiveDate,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: f64, purchase_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into().trim().to_uppercase(),
            quantity,
            purchase_date,
        }
    }
}
