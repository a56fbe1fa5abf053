use serde::{Deserialize, Serialize};

/// One simulated year in the 20-year growth projection.
///
/// Monetary fields are rounded to whole units at emission; the engine's
/// internal state stays full precision between years. `yield_on_cost_pct`
/// is never rounded. `shares` is rounded to 2 decimals for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Years from now (0 = today)
    pub year: u32,

    /// Portfolio value under the base scenario (5%/yr price growth)
    pub base_balance: f64,

    /// Portfolio value under the bear scenario (1%/yr price growth)
    pub bear_balance: f64,

    /// Portfolio value under the bull scenario (9%/yr price growth)
    pub bull_balance: f64,

    /// Dividend income received during this year
    pub annual_income: f64,

    /// Total dividends received before this year
    pub cumulative_dividends: f64,

    /// This year's income as a percentage of the initial investment
    pub yield_on_cost_pct: f64,

    /// Share count at the start of this year
    pub shares: f64,
}
