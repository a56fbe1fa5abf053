use serde::{Deserialize, Serialize};

use super::holding::Holding;
use super::metadata::MetadataCache;
use super::settings::Settings;

/// The main data container. Everything in here gets serialized and
/// handed to the host's key-value store.
///
/// Contains: holdings (user-entered positions), the metadata cache
/// (AI-fetched dividend data per ticker), and user settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioState {
    /// All user-entered positions, in insertion order
    pub holdings: Vec<Holding>,

    /// Cached dividend metadata — one entry per ticker.
    /// Populated by the metadata provider, consumed by the engine.
    pub metadata: MetadataCache,

    /// User settings (API keys, model id)
    #[serde(default)]
    pub settings: Settings,
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self {
            holdings: Vec::new(),
            metadata: MetadataCache::new(),
            settings: Settings::default(),
        }
    }
}
