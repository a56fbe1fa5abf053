use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::metadata::DividendMetadata;

/// Trait abstraction for dividend-metadata providers.
///
/// The production implementation asks a generative-AI search service
/// (Gemini with search grounding); tests swap in mocks. If the service
/// changes its response shape, only the one implementation is touched —
/// the rest of the codebase is untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MetadataProvider: Send + Sync {
    /// Human-readable name of this provider (for errors).
    fn name(&self) -> &str;

    /// Resolve dividend metadata for a ticker.
    ///
    /// Failures (network, rate limit, malformed payload) are recoverable:
    /// the engine simply treats the ticker as having no metadata until a
    /// later fetch succeeds.
    async fn fetch_metadata(&self, ticker: &str) -> Result<DividendMetadata, CoreError>;
}
