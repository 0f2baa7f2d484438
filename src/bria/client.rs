use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::utils::http::http_client;

/// Structured-prompt derivation failed. Distinct from a placeholder image:
/// the presentation layer messages the user instead of showing a broken
/// batch.
#[derive(Debug, thiserror::Error)]
#[error("Structured prompt derivation failed: {0}")]
pub struct DeriveError(pub String);

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/512?text=Error";

/// URL (or opaque handle) of one rendered image. A placeholder reference
/// stands in for a failed generation so a batch never aborts mid-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn placeholder() -> Self {
        ImageRef(PLACEHOLDER_IMAGE_URL.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_IMAGE_URL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructuredPromptResponse {
    pub result: Option<StructuredPromptResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StructuredPromptResult {
    pub structured_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageGenerateResponse {
    pub result: Option<ImageGenerateResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageGenerateResult {
    pub image_url: Option<String>,
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn redact_api_token(config: &Config, text: &str) -> String {
    let token = config.bria_api_token.trim();
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "[redacted]")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

/// Debug-log view of a request body with the base64 image reduced to its
/// length and long prompt strings truncated.
fn summarize_payload(payload: &Value) -> Value {
    let mut summary = payload.clone();
    if let Some(map) = summary.as_object_mut() {
        if let Some(len) = map.get("image_file").and_then(|v| v.as_str()).map(str::len) {
            map.insert("image_file".to_string(), json!({ "base64Len": len }));
        }
        if let Some(prompt) = map.get("prompt").and_then(|v| v.as_str()) {
            let replacement = truncate_for_log(prompt, 200);
            map.insert("prompt".to_string(), Value::String(replacement));
        }
        if let Some(structured) = map.get("structured_prompt").and_then(|v| v.as_str()) {
            let replacement = truncate_for_log(structured, 400);
            map.insert("structured_prompt".to_string(), Value::String(replacement));
        }
    }
    summary
}

/// One synchronous Bria call. No retries and no backoff: batches are cheap to
/// re-run and each variant already degrades independently on failure.
pub(crate) async fn post_json<T: DeserializeOwned>(
    config: &Config,
    path: &str,
    payload: &Value,
) -> Result<T> {
    let client = http_client();
    let url = format!("{}{}", config.bria_base_url.trim_end_matches('/'), path);

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(target: "bria.api", path = path, payload = %summarize_payload(payload));
    }

    let response = match client
        .post(&url)
        .header("api_token", &config.bria_api_token)
        .timeout(Duration::from_secs(config.bria_request_timeout_secs))
        .json(payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            let err_text = redact_api_token(config, &err.to_string());
            warn!(
                "Bria request failed to send: {} (timeout={}, connect={}, status={:?})",
                err_text,
                err.is_timeout(),
                err.is_connect(),
                err.status()
            );
            return Err(anyhow!("Bria request failed: {}", err_text));
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (message, body_summary) = summarize_error_body(&body);
        warn!("Bria API error: status={}, body={}", status, body_summary);
        let detail = message.unwrap_or(body_summary);
        return Err(anyhow!(
            "Bria request failed with status {}: {}",
            status,
            detail
        ));
    }

    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_recognizable() {
        assert!(ImageRef::placeholder().is_placeholder());
        assert!(!ImageRef("https://cdn.bria.ai/out.png".to_string()).is_placeholder());
    }

    #[test]
    fn error_body_prefers_nested_message() {
        let (message, _) =
            summarize_error_body(r#"{"error": {"message": "invalid api_token"}}"#);
        assert_eq!(message.as_deref(), Some("invalid api_token"));

        let (message, summary) = summarize_error_body("service unavailable");
        assert!(message.is_none());
        assert_eq!(summary, "service unavailable");
    }

    #[test]
    fn payload_summary_hides_image_bytes() {
        let payload = json!({ "image_file": "aGVsbG8=", "prompt": "a sneaker", "sync": true });
        let summary = summarize_payload(&payload);
        assert_eq!(summary["image_file"]["base64Len"], json!(8));
        assert_eq!(summary["sync"], json!(true));
    }

    #[test]
    fn token_is_redacted_from_errors() {
        let mut config = Config::load();
        config.bria_api_token = "secret-token".to_string();
        let redacted = redact_api_token(&config, "401 for token secret-token");
        assert_eq!(redacted, "401 for token [redacted]");
    }
}
