use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-configurable settings, stored alongside the portfolio state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "gemini").
    /// Values: the API key string.
    pub api_keys: HashMap<String, String>,

    /// Generative model id used for metadata fetches.
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_keys: HashMap::new(),
            model: "gemini-2.5-flash".to_string(),
        }
    }
}
