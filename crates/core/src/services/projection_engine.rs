use crate::models::metadata::MetadataCache;
use crate::models::projection::ProjectionPoint;
use crate::models::summary::PortfolioSummary;

/// Number of years simulated (inclusive of year 0 — 21 points total).
pub const PROJECTION_YEARS: u32 = 20;

/// Fixed annual price growth per scenario. These are modeling constants,
/// not derived from fetched data.
pub const BASE_GROWTH: f64 = 1.05;
pub const BEAR_GROWTH: f64 = 1.01;
pub const BULL_GROWTH: f64 = 1.09;

/// Assumed annual dividend growth when no metadata is cached (7%).
pub const DEFAULT_DIVIDEND_GROWTH: f64 = 0.07;

/// Simulates year-by-year dividend-reinvestment compounding under three
/// price scenarios (bear/base/bull).
///
/// Pure and deterministic: identical inputs always produce identical
/// output. The recurrence is inherently sequential — each year's state
/// depends on the previous year's.
///
/// All three scenario balances share one evolving share count, and
/// reinvestment is priced against the base track only. Bear/bull rates
/// change what the shares are worth, not how many accumulate. That
/// asymmetry is part of the model, not an accident.
pub struct ProjectionEngine;

impl ProjectionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Produce the 21-point projection (years 0..=20, ascending).
    ///
    /// Monetary fields in the emitted points are rounded to whole units;
    /// internal running state stays full precision. `yield_on_cost_pct`
    /// is never rounded; emitted `shares` is rounded to 2 decimals.
    pub fn project(&self, summary: &PortfolioSummary, cache: &MetadataCache) -> Vec<ProjectionPoint> {
        // Floor at 1 so year-over-year yield-on-cost never divides by zero.
        // Not a real dollar value.
        let initial_investment = if summary.total_value > 0.0 {
            summary.total_value
        } else {
            1.0
        };

        let avg_growth = cache
            .average_growth_rate_pct()
            .map_or(DEFAULT_DIVIDEND_GROWTH, |pct| pct / 100.0);

        let share_floor = summary.total_shares.max(1.0);
        let initial_avg_price = summary.total_value / share_floor;
        let initial_div_per_share = summary.annual_income / share_floor;

        let mut shares = summary.total_shares;
        let mut div_per_share = initial_div_per_share;
        let mut price_base = initial_avg_price;
        let mut price_bear = initial_avg_price;
        let mut price_bull = initial_avg_price;
        let mut cumulative_dividends: f64 = 0.0;

        let mut points = Vec::with_capacity((PROJECTION_YEARS + 1) as usize);

        for year in 0..=PROJECTION_YEARS {
            // Income at start-of-year share count and per-share rate,
            // before this year's reinvestment or growth.
            let income = shares * div_per_share;

            points.push(ProjectionPoint {
                year,
                base_balance: (shares * price_base).round(),
                bear_balance: (shares * price_bear).round(),
                bull_balance: (shares * price_bull).round(),
                annual_income: income.round(),
                cumulative_dividends: cumulative_dividends.round(),
                yield_on_cost_pct: (income / initial_investment) * 100.0,
                shares: (shares * 100.0).round() / 100.0,
            });

            cumulative_dividends += income;

            // DRIP against the base-case price track only — all three
            // balance tracks share the same share count.
            if price_base > 0.0 {
                shares += income / price_base;
            }

            div_per_share *= 1.0 + avg_growth;
            price_base *= BASE_GROWTH;
            price_bear *= BEAR_GROWTH;
            price_bull *= BULL_GROWTH;
        }

        points
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
