pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use std::collections::HashMap;

use models::{
    holding::{Holding, HoldingSortOrder},
    metadata::DividendMetadata,
    portfolio::PortfolioState,
    projection::ProjectionPoint,
    settings::Settings,
    summary::PortfolioSummary,
};
use providers::gemini::GeminiProvider;
use providers::traits::MetadataProvider;
use services::{
    aggregator::Aggregator, holdings_service::HoldingsService,
    projection_engine::ProjectionEngine,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Settings key for the Gemini API key.
const GEMINI_KEY: &str = "gemini";

/// Main entry point for the dividend dashboard core library.
/// Holds the portfolio state and all services needed to operate on it.
#[must_use]
pub struct DividendDashboard {
    state: PortfolioState,
    holdings_service: HoldingsService,
    aggregator: Aggregator,
    projection_engine: ProjectionEngine,
    /// The external metadata collaborator. `None` until an API key is
    /// configured (or a custom provider is injected).
    provider: Option<Box<dyn MetadataProvider>>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for DividendDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendDashboard")
            .field("holdings", &self.state.holdings.len())
            .field("cached_tickers", &self.state.metadata.len())
            .field("settings", &self.state.settings)
            .field("has_provider", &self.provider.is_some())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl DividendDashboard {
    /// Create a brand new empty portfolio with default settings.
    pub fn create_new() -> Self {
        let state = PortfolioState::default();
        Self::build(state)
    }

    /// Load an existing portfolio from serialized bytes.
    /// Use this for WASM / Tauri where the frontend handles storage I/O.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_bytes(data)?;
        Ok(Self::build(state))
    }

    /// Save the current portfolio to serialized bytes.
    /// Returns raw bytes that the frontend can persist.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.state)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from the two key-value blobs a browser-style host persists
    /// (holdings array + metadata object). Missing keys yield an empty
    /// portfolio.
    pub fn load_from_blobs(blobs: &HashMap<String, String>) -> Result<Self, CoreError> {
        let state = StorageManager::import_blobs(blobs)?;
        Ok(Self::build(state))
    }

    /// Export the two key-value blobs for the host to persist.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_blobs(&mut self) -> Result<HashMap<String, String>, CoreError> {
        let blobs = StorageManager::export_blobs(&self.state)?;
        self.dirty = false;
        Ok(blobs)
    }

    /// Load from a file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_file(path)?;
        Ok(Self::build(state))
    }

    /// Save to a file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.state, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Holding Management ──────────────────────────────────────────

    /// Add a holding to the portfolio. The ticker is normalized to
    /// uppercase; quantity must be positive. Does NOT fetch metadata —
    /// call `refresh_metadata` (or let the host do it) separately.
    pub fn add_holding(
        &mut self,
        ticker: impl Into<String>,
        quantity: f64,
        purchase_date: NaiveDate,
    ) -> Result<uuid::Uuid, CoreError> {
        let holding = Holding::new(ticker, quantity, purchase_date);
        let id = holding.id;
        self.holdings_service.add_holding(&mut self.state, holding)?;
        self.dirty = true;
        Ok(id)
    }

    /// Add multiple holdings at once. All holdings are validated first;
    /// if any fails validation, none are added (all-or-nothing).
    /// Returns the IDs of all added holdings.
    pub fn add_holdings(&mut self, holdings: Vec<Holding>) -> Result<Vec<uuid::Uuid>, CoreError> {
        for holding in &holdings {
            self.holdings_service.validate_holding(holding)?;
        }
        let ids = holdings.iter().map(|h| h.id).collect();
        self.state.holdings.extend(holdings);
        self.dirty = true;
        Ok(ids)
    }

    /// Remove a holding by its ID. Returns `true` if a holding was
    /// removed; an unknown ID is a no-op returning `false`.
    pub fn remove_holding(&mut self, id: uuid::Uuid) -> bool {
        let removed = self.holdings_service.remove_holding(&mut self.state, id);
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Get a single holding by its ID.
    #[must_use]
    pub fn get_holding(&self, id: uuid::Uuid) -> Option<&Holding> {
        self.state.holdings.iter().find(|h| h.id == id)
    }

    /// All holdings in insertion order.
    #[must_use]
    pub fn get_holdings(&self) -> &[Holding] {
        &self.state.holdings
    }

    /// Get holdings sorted by a specific order.
    #[must_use]
    pub fn get_holdings_sorted(&self, order: &HoldingSortOrder) -> Vec<&Holding> {
        self.holdings_service.get_holdings_sorted(&self.state, order)
    }

    /// Holdings for one ticker (case-insensitive).
    #[must_use]
    pub fn holdings_for_ticker(&self, ticker: &str) -> Vec<&Holding> {
        let upper = ticker.trim().to_uppercase();
        self.state
            .holdings
            .iter()
            .filter(|h| h.ticker == upper)
            .collect()
    }

    /// Get the total number of holdings.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.state.holdings.len()
    }

    /// All distinct held tickers, sorted.
    #[must_use]
    pub fn unique_tickers(&self) -> Vec<String> {
        self.holdings_service.unique_tickers(&self.state)
    }

    /// Held tickers with no cached metadata yet.
    #[must_use]
    pub fn tickers_missing_metadata(&self) -> Vec<String> {
        self.holdings_service.tickers_missing_metadata(&self.state)
    }

    /// Date of the earliest purchase, if any.
    #[must_use]
    pub fn earliest_purchase_date(&self) -> Option<NaiveDate> {
        self.state.holdings.iter().map(|h| h.purchase_date).min()
    }

    /// Date of the most recent purchase, if any.
    #[must_use]
    pub fn latest_purchase_date(&self) -> Option<NaiveDate> {
        self.state.holdings.iter().map(|h| h.purchase_date).max()
    }

    // ── Metadata Cache ──────────────────────────────────────────────

    /// Insert or replace the cached metadata for a ticker.
    /// Used by hosts that fetch through their own channel, and by tests.
    pub fn cache_metadata(&mut self, ticker: &str, data: DividendMetadata) {
        self.state.metadata.insert(ticker, data);
        self.dirty = true;
    }

    /// Look up cached metadata for a ticker. Never errors.
    #[must_use]
    pub fn lookup_metadata(&self, ticker: &str) -> Option<&DividendMetadata> {
        self.state.metadata.lookup(ticker)
    }

    /// Number of tickers with cached metadata.
    #[must_use]
    pub fn metadata_entry_count(&self) -> usize {
        self.state.metadata.len()
    }

    /// Remove cached metadata entries fetched before `cutoff`.
    /// Returns the number of entries removed.
    pub fn metadata_prune_older_than(&mut self, cutoff: chrono::DateTime<chrono::Utc>) -> usize {
        let removed = self.state.metadata.prune_older_than(cutoff);
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Clear all cached metadata.
    pub fn metadata_clear(&mut self) {
        self.state.metadata.clear();
        self.dirty = true;
    }

    // ── Metadata Fetching ───────────────────────────────────────────

    /// Fetch fresh metadata for one ticker from the provider and cache
    /// it (replacing any existing entry). Requires an API key or an
    /// injected provider.
    pub async fn refresh_metadata(&mut self, ticker: &str) -> Result<DividendMetadata, CoreError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| CoreError::MissingApiKey(GEMINI_KEY.to_string()))?;
        let data = provider.fetch_metadata(ticker).await?;
        self.state.metadata.insert(ticker, data.clone());
        self.dirty = true;
        Ok(data)
    }

    /// Fetch metadata for every held ticker that has no cache entry.
    /// Failures are recoverable and per-ticker: one bad ticker does not
    /// abort the rest. Returns the (ticker, error) pairs that failed.
    pub async fn refresh_missing_metadata(
        &mut self,
    ) -> Result<Vec<(String, CoreError)>, CoreError> {
        if self.provider.is_none() {
            return Err(CoreError::MissingApiKey(GEMINI_KEY.to_string()));
        }

        let mut failures = Vec::new();
        for ticker in self.tickers_missing_metadata() {
            if let Err(e) = self.refresh_metadata(&ticker).await {
                failures.push((ticker, e));
            }
        }
        Ok(failures)
    }

    /// Replace the metadata provider (e.g., with a mock in tests, or a
    /// host-supplied implementation).
    pub fn set_provider(&mut self, provider: Box<dyn MetadataProvider>) {
        self.provider = Some(provider);
    }

    // ── Aggregation & Projection ────────────────────────────────────

    /// Compute the current portfolio summary. Pure — recomputed from
    /// holdings + cache on every call.
    #[must_use]
    pub fn summary(&self) -> PortfolioSummary {
        self.aggregator
            .summarize(&self.state.holdings, &self.state.metadata)
    }

    /// Compute the 21-point (years 0..=20) growth projection from the
    /// current summary and cache. Pure and deterministic.
    #[must_use]
    pub fn projection(&self) -> Vec<ProjectionPoint> {
        let summary = self.summary();
        self.projection_engine.project(&summary, &self.state.metadata)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Set an API key for a provider (e.g., "gemini").
    /// Rebuilds the provider so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.state.settings.api_keys.insert(provider, key);
        self.provider = Self::build_provider(&self.state.settings);
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.state.settings.api_keys.remove(provider).is_some();
        if removed {
            self.provider = Self::build_provider(&self.state.settings);
            self.dirty = true;
        }
        removed
    }

    /// Set the generative model id used for metadata fetches.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.state.settings.model = model.into();
        self.provider = Self::build_provider(&self.state.settings);
        self.dirty = true;
    }

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Returns `true` if the portfolio has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all holdings as a JSON string.
    pub fn export_holdings_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state.holdings).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize holdings to JSON: {e}"))
        })
    }

    /// Export all holdings as a CSV string.
    /// Columns: id, ticker, quantity, purchase_date
    #[must_use]
    pub fn export_holdings_to_csv(&self) -> String {
        let mut csv = String::from("id,ticker,quantity,purchase_date\n");
        for holding in &self.state.holdings {
            // Escape CSV: quote tickers containing commas, quotes, or newlines
            let ticker = &holding.ticker;
            let escaped_ticker = if ticker.contains(',') || ticker.contains('"') || ticker.contains('\n') {
                format!("\"{}\"", ticker.replace('"', "\"\""))
            } else {
                ticker.clone()
            };
            csv.push_str(&format!(
                "{},{},{},{}\n",
                holding.id, escaped_ticker, holding.quantity, holding.purchase_date,
            ));
        }
        csv
    }

    /// Import holdings from a JSON string. Validates each holding;
    /// all-or-nothing. Returns the number of holdings imported.
    pub fn import_holdings_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let holdings: Vec<Holding> = serde_json::from_str(json)?;
        let count = holdings.len();
        self.add_holdings(holdings)?;
        Ok(count)
    }

    /// Export the full portfolio state as JSON (debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize state: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(state: PortfolioState) -> Self {
        let provider = Self::build_provider(&state.settings);
        Self {
            state,
            holdings_service: HoldingsService::new(),
            aggregator: Aggregator::new(),
            projection_engine: ProjectionEngine::new(),
            provider,
            dirty: false,
        }
    }

    fn build_provider(settings: &Settings) -> Option<Box<dyn MetadataProvider>> {
        settings.api_keys.get(GEMINI_KEY).map(|key| {
            Box::new(GeminiProvider::new(key.clone(), settings.model.clone()))
                as Box<dyn MetadataProvider>
        })
    }
}
