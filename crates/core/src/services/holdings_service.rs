use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingSortOrder};
use crate::models::portfolio::PortfolioState;

/// Manages the holding list: validated adds, replace-by-filter removal,
/// listings.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// Add a new holding to the portfolio.
    /// Validates before appending (positive quantity, non-empty ticker).
    pub fn add_holding(&self, state: &mut PortfolioState, holding: Holding) -> Result<(), CoreError> {
        self.validate_holding(&holding)?;
        state.holdings.push(holding);
        Ok(())
    }

    /// Remove a holding by its UUID via replace-by-filter.
    /// Returns `true` if a holding was removed, `false` when the id is
    /// unknown (a no-op, not an error).
    pub fn remove_holding(&self, state: &mut PortfolioState, id: Uuid) -> bool {
        let before = state.holdings.len();
        state.holdings.retain(|h| h.id != id);
        state.holdings.len() != before
    }

    /// Get all holdings sorted by a specific order.
    pub fn get_holdings_sorted<'a>(
        &self,
        state: &'a PortfolioState,
        order: &HoldingSortOrder,
    ) -> Vec<&'a Holding> {
        let mut holdings: Vec<&Holding> = state.holdings.iter().collect();
        match order {
            HoldingSortOrder::TickerAsc => holdings.sort_by(|a, b| a.ticker.cmp(&b.ticker)),
            HoldingSortOrder::TickerDesc => holdings.sort_by(|a, b| b.ticker.cmp(&a.ticker)),
            HoldingSortOrder::QuantityDesc => holdings.sort_by(|a, b| {
                b.quantity
                    .partial_cmp(&a.quantity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            HoldingSortOrder::QuantityAsc => holdings.sort_by(|a, b| {
                a.quantity
                    .partial_cmp(&b.quantity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            HoldingSortOrder::DateAsc => holdings.sort_by_key(|h| h.purchase_date),
            HoldingSortOrder::DateDesc => {
                holdings.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date))
            }
        }
        holdings
    }

    /// All distinct tickers across holdings, sorted.
    pub fn unique_tickers(&self, state: &PortfolioState) -> Vec<String> {
        let mut tickers: Vec<String> = state.holdings.iter().map(|h| h.ticker.clone()).collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }

    /// Held tickers that have no cache entry yet — the ones a refresh
    /// should fetch.
    pub fn tickers_missing_metadata(&self, state: &PortfolioState) -> Vec<String> {
        self.unique_tickers(state)
            .into_iter()
            .filter(|t| !state.metadata.contains(t))
            .collect()
    }

    /// Validate a holding before adding it to the portfolio.
    ///
    /// Rules:
    /// - Quantity must be positive
    /// - Ticker must be non-empty
    pub fn validate_holding(&self, holding: &Holding) -> Result<(), CoreError> {
        if holding.ticker.is_empty() {
            return Err(CoreError::ValidationError(
                "Ticker must not be empty".into(),
            ));
        }
        if !holding.quantity.is_finite() || holding.quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be positive, got {}",
                holding.quantity
            )));
        }
        Ok(())
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
