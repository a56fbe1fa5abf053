use crate::models::holding::Holding;
use crate::models::metadata::MetadataCache;
use crate::models::summary::PortfolioSummary;

/// Reduces holdings + cached metadata into portfolio-level aggregates.
///
/// Pure business logic — no I/O, no API calls. Holdings whose ticker has
/// no cached metadata still count toward the share total but contribute
/// nothing to value or income.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the portfolio summary.
    ///
    /// - `total_shares`: every holding counts, metadata or not.
    /// - `total_value` / `annual_income`: only holdings with resolved
    ///   metadata contribute.
    /// - `average_yield_pct` and `yield_on_cost_pct` are both
    ///   income/value × 100 — the upstream model conflates them, and
    ///   that behavior is preserved.
    pub fn summarize(&self, holdings: &[Holding], cache: &MetadataCache) -> PortfolioSummary {
        let mut total_shares = 0.0;
        let mut total_value = 0.0;
        let mut annual_income = 0.0;

        for holding in holdings {
            total_shares += holding.quantity;

            if let Some(meta) = cache.lookup(&holding.ticker) {
                total_value += holding.quantity * meta.current_price;
                annual_income += holding.quantity * meta.annual_dividend_per_share;
            }
        }

        let yield_pct = if total_value > 0.0 {
            (annual_income / total_value) * 100.0
        } else {
            0.0
        };

        PortfolioSummary {
            total_value,
            annual_income,
            average_yield_pct: yield_pct,
            yield_on_cost_pct: yield_pct,
            total_shares,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
