use serde::{Deserialize, Serialize};

/// Portfolio-level aggregates, recomputed whenever holdings or cached
/// metadata change. Never persisted — always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of quantity × current price over holdings with resolved metadata
    pub total_value: f64,

    /// Sum of quantity × annual dividend per share over holdings with resolved metadata
    pub annual_income: f64,

    /// (annual_income / total_value) × 100, or 0 when total_value is 0
    pub average_yield_pct: f64,

    /// Computed identically to `average_yield_pct` — the upstream model
    /// does not use cost basis here. Kept as a separate field so the two
    /// can diverge if the semantics are ever revisited.
    pub yield_on_cost_pct: f64,

    /// Sum of quantities across ALL holdings, metadata or not
    pub total_shares: f64,
}

impl PortfolioSummary {
    /// An all-zero summary (empty portfolio).
    pub fn empty() -> Self {
        Self {
            total_value: 0.0,
            annual_income: 0.0,
            average_yield_pct: 0.0,
            yield_on_cost_pct: 0.0,
            total_shares: 0.0,
        }
    }
}
