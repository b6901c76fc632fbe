use crate::core::matchmaker::{validate_request, BackendError, SuggestionBackend};
use crate::core::prompt::render_prompt;
use crate::models::{MatchRequest, MatchSuggestions};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

impl From<GeminiError> for BackendError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::QuotaExceeded(msg) => BackendError::QuotaExceeded(msg),
            GeminiError::SchemaViolation(msg) => BackendError::SchemaViolation(msg),
            GeminiError::EmptyResponse => BackendError::SchemaViolation("model returned no content".into()),
            other => BackendError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Gemini `generateContent` client
///
/// One request per call, no retries. The reply is constrained to a JSON
/// object with a single `suggestedMatches` string.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            endpoint,
            api_key,
            model,
            temperature,
            client,
        }
    }

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "suggestedMatches": { "type": "STRING" }
            },
            "required": ["suggestedMatches"]
        })
    }

    /// Send the rendered prompt and return the validated output object
    pub async fn generate(&self, request: &MatchRequest) -> Result<MatchSuggestions, GeminiError> {
        validate_request(request).map_err(|e| GeminiError::SchemaViolation(e.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: render_prompt(request) }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json",
                response_schema: Self::response_schema(),
            },
        };

        tracing::debug!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<ApiErrorEnvelope>(&text).ok();
            let exhausted = parsed
                .as_ref()
                .and_then(|e| e.error.status.as_deref())
                .map(|s| s == "RESOURCE_EXHAUSTED")
                .unwrap_or(false);
            let message = parsed.map(|e| e.error.message).unwrap_or(text);

            tracing::warn!("Gemini returned {}: {}", status, message);

            if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
                return Err(GeminiError::QuotaExceeded(message));
            }
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateResponse = response.json().await?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or(GeminiError::EmptyResponse)?;

        parse_output(&text)
    }
}

/// Validate model text against the output schema
fn parse_output(text: &str) -> Result<MatchSuggestions, GeminiError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| GeminiError::SchemaViolation(format!("output is not JSON: {}", e)))?;

    match value.get("suggestedMatches") {
        Some(Value::String(s)) => Ok(MatchSuggestions { suggested_matches: s.clone() }),
        Some(_) => Err(GeminiError::SchemaViolation("suggestedMatches must be a string".into())),
        None => Err(GeminiError::SchemaViolation("missing suggestedMatches".into())),
    }
}

#[async_trait]
impl SuggestionBackend for GeminiClient {
    async fn suggest(&self, request: &MatchRequest) -> Result<MatchSuggestions, BackendError> {
        self.generate(request).await.map_err(BackendError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_schema() {
        let ok = parse_output(r#"{"suggestedMatches":"A (1/100) x"}"#).unwrap();
        assert_eq!(ok.suggested_matches, "A (1/100) x");

        assert!(matches!(parse_output("plain text"), Err(GeminiError::SchemaViolation(_))));
        assert!(matches!(parse_output(r#"{"suggestedMatches":3}"#), Err(GeminiError::SchemaViolation(_))));
        assert!(matches!(parse_output(r#"{"other":"x"}"#), Err(GeminiError::SchemaViolation(_))));
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            BackendError::from(GeminiError::QuotaExceeded("q".into())),
            BackendError::QuotaExceeded("q".into())
        );
        assert!(matches!(
            BackendError::from(GeminiError::ApiError { status: 503, message: "down".into() }),
            BackendError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_blank_input_without_calling_api() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9".to_string(),
            "key".to_string(),
            "gemini-1.5-flash".to_string(),
            0.7,
            5,
        );

        let err = client.generate(&MatchRequest::new("", "x")).await.unwrap_err();
        assert!(matches!(err, GeminiError::SchemaViolation(_)));
    }
}
