use crate::types::{validate_enrichment, EnrichError, EnrichmentRequest, EnrichmentResponse};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::instrument;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct EnrichClient {
    client: Client,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl EnrichClient {
    pub fn new(api_key: String, model: String, timeout_ms: u64, max_retries: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            api_key,
            model,
            max_retries,
        }
    }

    fn extract_text_content(response_body: &serde_json::Value) -> Result<&str, EnrichError> {
        let content_arr = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                EnrichError::SchemaValidationFailed("Missing or invalid 'content' field".into())
            })?;

        content_arr
            .iter()
            .find(|item| item["type"] == "text")
            .and_then(|item| item["text"].as_str())
            .ok_or_else(|| EnrichError::SchemaValidationFailed("Missing 'text' content".into()))
    }

    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    pub async fn enrich(
        &self,
        request: EnrichmentRequest,
    ) -> Result<EnrichmentResponse, EnrichError> {
        let schemars_schema = schemars::schema_for!(EnrichmentResponse);
        let schema_json =
            serde_json::to_string_pretty(&schemars_schema).map_err(EnrichError::JsonError)?;

        let system_prompt = format!(
            r#"You are a concise crypto market analyst writing report cells for a pump-candidate screen.
Given a coin's numeric snapshot, summarize its utility plus near-term catalysts, list warning signs, and give a verdict.
You must output strictly valid JSON conforming to the schema below.
Do NOT output any markdown blocks or conversational text. JUST the JSON object.

JSON Schema:
{}
"#,
            schema_json
        );

        let user_prompt = json!({
            "task": "summarize_pump_candidate",
            "coin_id": &request.coin_id,
            "symbol": &request.symbol,
            "name": &request.name,
            "snapshot": &request.snapshot,
            "current_time_ms": request.as_of_ts_ms
        });

        let payload = json!({
            "model": self.model,
            "max_tokens": 512,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": serde_json::to_string(&user_prompt)?
                }
            ]
        });

        let mut attempt = 0u32;
        loop {
            let send_result = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&payload)
                .send()
                .await;

            match send_result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        if status.as_u16() == 429 && attempt < self.max_retries {
                            attempt += 1;
                            sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                            continue;
                        }
                        return Err(EnrichError::HttpStatus {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    let response_body: serde_json::Value = response
                        .json()
                        .await
                        .map_err(|e| EnrichError::ApiError(e.to_string()))?;
                    let text_content = Self::extract_text_content(&response_body)?;

                    // Prompt requests JSON-only; still trim any wrapper text
                    // around the outermost object.
                    let json_start = text_content.find('{').unwrap_or(0);
                    let json_end = text_content
                        .rfind('}')
                        .map(|i| i + 1)
                        .unwrap_or(text_content.len());
                    let json_str = &text_content[json_start..json_end];

                    let enrichment: EnrichmentResponse =
                        serde_json::from_str(json_str).map_err(EnrichError::JsonError)?;
                    validate_enrichment(&enrichment)?;
                    return Ok(enrichment);
                }
                Err(e) => {
                    if e.is_timeout() {
                        if attempt < self.max_retries {
                            attempt += 1;
                            sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                            continue;
                        }
                        return Err(EnrichError::Timeout);
                    }
                    if attempt < self.max_retries {
                        attempt += 1;
                        sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                        continue;
                    }
                    return Err(EnrichError::ApiError(e.to_string()));
                }
            }
        }
    }
}
