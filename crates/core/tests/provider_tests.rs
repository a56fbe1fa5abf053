// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Gemini response parsing against canned JSON.
// No network: the HTTP layer is exercised only through the parser it
// shares with `fetch_metadata`.
// ═══════════════════════════════════════════════════════════════════

use dividend_dashboard_core::errors::CoreError;
use dividend_dashboard_core::models::metadata::PayoutFrequency;
use dividend_dashboard_core::providers::gemini::{parse_response_json, GeminiProvider};
use dividend_dashboard_core::providers::traits::MetadataProvider;

/// Wrap a model reply (and optional grounding chunks) in the
/// generateContent envelope.
fn envelope(text: &str, chunks: &str) -> String {
    format!(
        r#"{{
            "candidates": [{{
                "content": {{ "parts": [{{ "text": {} }}] }},
                "groundingMetadata": {{ "groundingChunks": [{chunks}] }}
            }}]
        }}"#,
        serde_json::to_string(text).unwrap()
    )
}

const VALID_PAYLOAD: &str = r#"{
    "name": "Realty Income Corporation",
    "currentPrice": 58.2,
    "yieldPct": 5.43,
    "annualDividendPerShare": 3.16,
    "growthRatePct": 3.5,
    "payoutFrequency": "Monthly"
}"#;

#[test]
fn parses_a_valid_grounded_response() {
    let chunks = r#"
        {"web": {"uri": "https://a.com/o", "title": "Site A"}},
        {"web": {"uri": "https://b.com/o", "title": "Site B"}},
        {"web": {"uri": "https://a.com/o", "title": "Site A again"}}
    "#;
    let body = envelope(VALID_PAYLOAD, chunks);

    let meta = parse_response_json("o", &body).unwrap();
    assert_eq!(meta.ticker, "O");
    assert_eq!(meta.name, "Realty Income Corporation");
    assert_eq!(meta.current_price, 58.2);
    assert_eq!(meta.annual_dividend_per_share, 3.16);
    assert_eq!(meta.payout_frequency, PayoutFrequency::Monthly);

    // Citations deduplicated by URI, order preserved.
    assert_eq!(meta.sources.len(), 2);
    assert_eq!(meta.sources[0].uri, "https://a.com/o");
    assert_eq!(meta.sources[0].title, "Site A");
    assert_eq!(meta.sources[1].uri, "https://b.com/o");
}

#[test]
fn strips_markdown_code_fences_around_the_payload() {
    let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
    let body = envelope(&fenced, "");
    let meta = parse_response_json("O", &body).unwrap();
    assert_eq!(meta.current_price, 58.2);
}

#[test]
fn missing_required_field_is_rejected_not_guessed() {
    // No fallback probing: a payload without annualDividendPerShare is
    // a hard API error.
    let payload = r#"{
        "name": "Realty Income",
        "currentPrice": 58.2,
        "yieldPct": 5.43,
        "growthRatePct": 3.5,
        "payoutFrequency": "Monthly"
    }"#;
    let body = envelope(payload, "");
    let result = parse_response_json("O", &body);
    assert!(matches!(result, Err(CoreError::Api { .. })));
}

#[test]
fn prose_instead_of_json_is_rejected() {
    let body = envelope("Realty Income pays about $3.16 per share annually.", "");
    assert!(matches!(
        parse_response_json("O", &body),
        Err(CoreError::Api { .. })
    ));
}

#[test]
fn negative_price_is_rejected() {
    let payload = VALID_PAYLOAD.replace("58.2", "-58.2");
    let body = envelope(&payload, "");
    assert!(parse_response_json("O", &body).is_err());
}

#[test]
fn negative_dividend_is_rejected() {
    let payload = VALID_PAYLOAD.replace("3.16", "-3.16");
    let body = envelope(&payload, "");
    assert!(parse_response_json("O", &body).is_err());
}

#[test]
fn unknown_payout_frequency_is_rejected() {
    let payload = VALID_PAYLOAD.replace("Monthly", "Fortnightly");
    let body = envelope(&payload, "");
    let err = parse_response_json("O", &body).unwrap_err();
    assert!(err.to_string().contains("payoutFrequency"));
}

#[test]
fn empty_candidates_signal_absence_not_malformation() {
    // No candidates at all: the service has nothing for this ticker.
    for body in [r#"{"candidates": []}"#, r#"{}"#] {
        let err = parse_response_json("o", body).unwrap_err();
        match err {
            CoreError::MetadataNotAvailable { ticker } => assert_eq!(ticker, "O"),
            other => panic!("expected MetadataNotAvailable, got {other:?}"),
        }
    }
}

#[test]
fn reply_without_text_parts_signals_absence() {
    let body = r#"{"candidates": [{"content": {"parts": []}}]}"#;
    assert!(matches!(
        parse_response_json("O", body),
        Err(CoreError::MetadataNotAvailable { .. })
    ));
}

#[test]
fn unrecognized_envelope_is_rejected() {
    assert!(parse_response_json("O", "not json at all").is_err());
}

#[test]
fn response_without_grounding_has_no_sources() {
    let body = format!(
        r#"{{"candidates": [{{"content": {{"parts": [{{"text": {}}}]}}}}]}}"#,
        serde_json::to_string(VALID_PAYLOAD).unwrap()
    );
    let meta = parse_response_json("O", &body).unwrap();
    assert!(meta.sources.is_empty());
}

#[test]
fn grounding_chunks_without_web_data_are_skipped() {
    let chunks = r#"{"web": null}, {"web": {"uri": null, "title": "no uri"}}"#;
    let body = envelope(VALID_PAYLOAD, chunks);
    let meta = parse_response_json("O", &body).unwrap();
    assert!(meta.sources.is_empty());
}

#[test]
fn citation_without_title_falls_back_to_uri() {
    let chunks = r#"{"web": {"uri": "https://a.com/o", "title": null}}"#;
    let body = envelope(VALID_PAYLOAD, chunks);
    let meta = parse_response_json("O", &body).unwrap();
    assert_eq!(meta.sources[0].title, "https://a.com/o");
}

#[test]
fn provider_reports_its_name() {
    let provider = GeminiProvider::new("key".into(), "gemini-2.5-flash".into());
    assert_eq!(provider.name(), "Gemini");
}
