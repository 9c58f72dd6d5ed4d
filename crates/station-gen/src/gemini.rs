//! Gemini REST client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::model::AiModel;
use crate::service::{GenerativeService, ServiceError};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: AiModel,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: AiModel) -> Result<Self, ServiceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ServiceError::NotConfigured(
                "Gemini API key not found. Set GEMINI_API_KEY or API_KEY.".into(),
            ));
        }
        Ok(Self {
            http: Client::new(),
            api_key,
            model,
        })
    }

    async fn generate(&self, body: Value) -> Result<String, ServiceError> {
        let url = format!(
            "{}/models/{}:generateContent",
            GEMINI_API_BASE,
            self.model.id()
        );
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        response_text(&body).ok_or_else(|| ServiceError::Malformed("response carried no text".into()))
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, ServiceError> {
        self.generate(request_body(prompt, None)).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, ServiceError> {
        let text = self.generate(request_body(prompt, Some(schema))).await?;
        serde_json::from_str(text.trim()).map_err(|e| ServiceError::Malformed(e.to_string()))
    }
}

fn request_body(prompt: &str, schema: Option<&Value>) -> Value {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
    });
    if let Some(schema) = schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

/// Concatenates the text parts of the first candidate.
fn response_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = GeminiClient::new("  ", AiModel::default()).err().unwrap();
        assert!(matches!(err, ServiceError::NotConfigured(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn structured_requests_carry_the_schema() {
        let schema = json!({ "type": "ARRAY" });
        let body = request_body("hi", Some(&schema));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");

        assert!(request_body("hi", None).get("generationConfig").is_none());
    }

    #[test]
    fn text_is_read_from_the_first_candidate() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Glitch" }, { "text": "_King" }] } }]
        });
        assert_eq!(response_text(&body).as_deref(), Some("Glitch_King"));
        assert_eq!(response_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error": {"code": 429, "message": "Resource exhausted"}}"#;
        assert_eq!(error_message(body), "Resource exhausted");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }
}
