use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::metadata::{DividendMetadata, MetadataCache};
use crate::models::portfolio::PortfolioState;
use crate::models::settings::Settings;

/// Key under which the holdings blob is stored in the host's key-value store.
pub const KEY_HOLDINGS: &str = "dividend_holdings";

/// Key under which the metadata blob is stored in the host's key-value store.
pub const KEY_METADATA: &str = "dividend_metadata";

/// Single-document form used by `save_to_bytes`/`load_from_bytes`:
/// the two key-value blobs plus settings, bundled into one JSON object.
#[derive(Serialize, Deserialize)]
struct PersistedDocument {
    #[serde(rename = "dividend_holdings")]
    holdings: Vec<Holding>,

    #[serde(rename = "dividend_metadata")]
    metadata: HashMap<String, DividendMetadata>,

    #[serde(default)]
    settings: Settings,
}

/// High-level persistence operations.
///
/// The wire contract is two string-keyed JSON blobs (a holdings array and
/// a ticker-keyed metadata object) — no versioning, no migration. Hosts
/// with a key-value store use `export_blobs`/`import_blobs`; hosts that
/// persist a single value (or a file) use the bundled bytes form.
pub struct StorageManager;

impl StorageManager {
    /// Serialize state into the two key-value blobs.
    pub fn export_blobs(state: &PortfolioState) -> Result<HashMap<String, String>, CoreError> {
        let holdings = serde_json::to_string(&state.holdings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize holdings: {e}")))?;
        let metadata = serde_json::to_string(&state.metadata.entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize metadata: {e}")))?;

        let mut blobs = HashMap::new();
        blobs.insert(KEY_HOLDINGS.to_string(), holdings);
        blobs.insert(KEY_METADATA.to_string(), metadata);
        Ok(blobs)
    }

    /// Rebuild state from key-value blobs. A missing key yields an empty
    /// collection; a malformed blob is a hard error.
    pub fn import_blobs(blobs: &HashMap<String, String>) -> Result<PortfolioState, CoreError> {
        let holdings: Vec<Holding> = match blobs.get(KEY_HOLDINGS) {
            Some(blob) => serde_json::from_str(blob).map_err(|e| {
                CoreError::Deserialization(format!("Failed to parse holdings blob: {e}"))
            })?,
            None => Vec::new(),
        };

        let entries: HashMap<String, DividendMetadata> = match blobs.get(KEY_METADATA) {
            Some(blob) => serde_json::from_str(blob).map_err(|e| {
                CoreError::Deserialization(format!("Failed to parse metadata blob: {e}"))
            })?,
            None => HashMap::new(),
        };

        Ok(PortfolioState {
            holdings,
            metadata: MetadataCache { entries },
            settings: Settings::default(),
        })
    }

    /// Serialize the full state (blobs + settings) to one JSON document.
    pub fn save_to_bytes(state: &PortfolioState) -> Result<Vec<u8>, CoreError> {
        let doc = PersistedDocument {
            holdings: state.holdings.clone(),
            metadata: state.metadata.entries.clone(),
            settings: state.settings.clone(),
        };
        serde_json::to_vec(&doc)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize state: {e}")))
    }

    /// Deserialize a full state from one JSON document.
    pub fn load_from_bytes(data: &[u8]) -> Result<PortfolioState, CoreError> {
        let doc: PersistedDocument = serde_json::from_slice(data)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse state: {e}")))?;
        Ok(PortfolioState {
            holdings: doc.holdings,
            metadata: MetadataCache {
                entries: doc.metadata,
            },
            settings: doc.settings,
        })
    }

    /// Save state to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(state: &PortfolioState, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(state)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load state from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<PortfolioState, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
