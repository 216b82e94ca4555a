use common::Verdict;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest text we accept for a single report cell.
const MAX_FIELD_CHARS: usize = 600;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnrichmentRequest {
    pub request_id: Uuid,
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    // JSON object with the candidate's numeric fields for model context
    pub snapshot: serde_json::Value,
    pub as_of_ts_ms: i64,
}

/// Structured summary for one candidate row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentResponse {
    /// Utility and upcoming catalysts, one or two sentences.
    pub utility: String,
    /// Warning signs, one or two sentences.
    pub red_flags: String,
    pub verdict: Verdict,
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(String),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Timeout")]
    Timeout,
    #[error("Schema validation failed: {0}")]
    SchemaValidationFailed(String),
}

/// Static fallback used whenever enrichment fails or is disabled mid-run.
pub fn placeholder_enrichment() -> EnrichmentResponse {
    EnrichmentResponse {
        utility: "No AI summary available.".to_string(),
        red_flags: "-".to_string(),
        verdict: Verdict::Watch,
    }
}

pub fn validate_enrichment(response: &EnrichmentResponse) -> Result<(), EnrichError> {
    if response.utility.trim().is_empty() {
        return Err(EnrichError::SchemaValidationFailed(
            "utility must not be empty".into(),
        ));
    }
    if response.red_flags.trim().is_empty() {
        return Err(EnrichError::SchemaValidationFailed(
            "red_flags must not be empty".into(),
        ));
    }
    if response.utility.chars().count() > MAX_FIELD_CHARS {
        return Err(EnrichError::SchemaValidationFailed(format!(
            "utility exceeds {} chars",
            MAX_FIELD_CHARS
        )));
    }
    if response.red_flags.chars().count() > MAX_FIELD_CHARS {
        return Err(EnrichError::SchemaValidationFailed(format!(
            "red_flags exceeds {} chars",
            MAX_FIELD_CHARS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_valid_and_watch() {
        let fallback = placeholder_enrichment();
        assert!(validate_enrichment(&fallback).is_ok());
        assert_eq!(fallback.verdict, Verdict::Watch);
    }

    #[test]
    fn empty_utility_is_rejected() {
        let response = EnrichmentResponse {
            utility: "  ".into(),
            red_flags: "-".into(),
            verdict: Verdict::Avoid,
        };
        assert!(matches!(
            validate_enrichment(&response),
            Err(EnrichError::SchemaValidationFailed(_))
        ));
    }

    #[test]
    fn oversized_field_is_rejected() {
        let response = EnrichmentResponse {
            utility: "x".repeat(MAX_FIELD_CHARS + 1),
            red_flags: "-".into(),
            verdict: Verdict::Watch,
        };
        assert!(validate_enrichment(&response).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected_on_deserialize() {
        let raw = r#"{"utility":"u","red_flags":"r","verdict":"BUY","extra":1}"#;
        assert!(serde_json::from_str::<EnrichmentResponse>(raw).is_err());
    }
}
