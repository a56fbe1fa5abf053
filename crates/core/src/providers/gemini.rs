use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::MetadataProvider;
use crate::errors::CoreError;
use crate::models::metadata::{
    dedup_sources, DividendMetadata, PayoutFrequency, SourceCitation,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PROVIDER_NAME: &str = "Gemini";

/// Gemini provider for dividend metadata.
///
/// - **Requires**: API key (set via settings as "gemini").
/// - **Strategy**: one grounded `generateContent` call per ticker; the
///   prompt demands a bare JSON object, and the reply is parsed with a
///   strict schema. Malformed or incomplete payloads are rejected
///   outright — no substring probing or regex fallbacks.
/// - Search-grounding citations become `sources`, deduplicated by URI.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
            model,
        }
    }
}

// ── Gemini API request types ────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

// ── Gemini API response types ───────────────────────────────────────

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// The JSON object the model is asked to produce. Every field is
/// required; a reply missing any of them is rejected as malformed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DividendPayload {
    name: String,
    current_price: f64,
    yield_pct: f64,
    annual_dividend_per_share: f64,
    growth_rate_pct: f64,
    payout_frequency: String,
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message,
    }
}

fn build_prompt(ticker: &str) -> String {
    format!(
        "Search for current dividend data for the stock ticker {ticker}. \
         Respond with ONLY a JSON object (no prose, no markdown) with exactly these keys: \
         \"name\" (string, company name), \
         \"currentPrice\" (number, current share price in USD), \
         \"yieldPct\" (number, trailing dividend yield in percent), \
         \"annualDividendPerShare\" (number, total dividend per share per year in USD), \
         \"growthRatePct\" (number, 5-year dividend growth rate in percent), \
         \"payoutFrequency\" (string, one of \"Monthly\", \"Quarterly\", \"Annually\")."
    )
}

/// Strip a Markdown code fence from around a JSON payload, if present.
/// Models often wrap replies in ```json ... ``` despite instructions.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a full `generateContent` response body into metadata for
/// `ticker`. Split out from the HTTP call so it can be exercised
/// against canned JSON without a network.
pub fn parse_response_json(ticker: &str, body: &str) -> Result<DividendMetadata, CoreError> {
    let resp: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| api_error(format!("Unrecognized response envelope for {ticker}: {e}")))?;

    // An empty reply is the service's absence signal for the ticker,
    // distinct from a malformed payload.
    let candidate = resp
        .candidates
        .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
        .ok_or_else(|| CoreError::MetadataNotAvailable {
            ticker: ticker.trim().to_uppercase(),
        })?;

    let text = candidate
        .content
        .and_then(|c| c.parts)
        .and_then(|parts| parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| CoreError::MetadataNotAvailable {
            ticker: ticker.trim().to_uppercase(),
        })?;

    let payload: DividendPayload = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| api_error(format!("Malformed dividend payload for {ticker}: {e}")))?;

    if !payload.current_price.is_finite() || payload.current_price < 0.0 {
        return Err(api_error(format!(
            "Invalid currentPrice {} for {ticker}",
            payload.current_price
        )));
    }
    if !payload.annual_dividend_per_share.is_finite() || payload.annual_dividend_per_share < 0.0 {
        return Err(api_error(format!(
            "Invalid annualDividendPerShare {} for {ticker}",
            payload.annual_dividend_per_share
        )));
    }
    let payout_frequency = PayoutFrequency::parse(&payload.payout_frequency).ok_or_else(|| {
        api_error(format!(
            "Unknown payoutFrequency '{}' for {ticker}",
            payload.payout_frequency
        ))
    })?;

    let sources = candidate
        .grounding_metadata
        .map(|g| {
            g.grounding_chunks
                .into_iter()
                .filter_map(|chunk| {
                    let web = chunk.web?;
                    let uri = web.uri?;
                    Some(SourceCitation {
                        title: web.title.unwrap_or_else(|| uri.clone()),
                        uri,
                    })
                })
                .collect()
        })
        .map(dedup_sources)
        .unwrap_or_default();

    Ok(DividendMetadata {
        ticker: ticker.trim().to_uppercase(),
        name: payload.name,
        current_price: payload.current_price,
        yield_pct: payload.yield_pct,
        annual_dividend_per_share: payload.annual_dividend_per_share,
        growth_rate_pct: payload.growth_rate_pct,
        payout_frequency,
        last_updated: Utc::now(),
        sources,
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MetadataProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_metadata(&self, ticker: &str) -> Result<DividendMetadata, CoreError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: build_prompt(ticker),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let url = format!("{BASE_URL}/{}:generateContent", self.model);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CoreError::RateLimited {
                provider: PROVIDER_NAME.into(),
            });
        }
        if !resp.status().is_success() {
            return Err(api_error(format!(
                "HTTP {} fetching metadata for {ticker}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        parse_response_json(ticker, &body)
    }
}
