use crate::error::{ProviderError, Result};
use crate::retry::{with_retry, RetryPolicy};
use crate::traits::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Chat-completions client for OpenRouter-compatible backends.
///
/// Rate limits, server errors and network failures surface as transient and
/// are retried with exponential backoff; auth and routing problems surface
/// as configuration errors and fail fast.
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Reads the API key from `OPENROUTER_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ProviderError::Config("OPENROUTER_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, model))
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn request_once(&self, prompt: &str, temperature: f64) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transient(format!("request failed: {err}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(ProviderError::Transient(format!("HTTP {status} from {}", self.model)));
        }
        if !status.is_success() {
            return Err(ProviderError::Config(format!("HTTP {status} from {}", self.model)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(format!("invalid response body: {err}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Malformed("response had no choices".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn generate(&self, prompt: &str, temperature: f64) -> Result<String> {
        log::debug!(
            "Requesting completion from {} ({} prompt chars, temperature {temperature})",
            self.model,
            prompt.len()
        );
        with_retry(self.retry, || self.request_once(prompt, temperature)).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_serializes_to_chat_completions_shape() {
        let body = ChatRequest {
            model: "google/gemini-flash-1.5",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).expect("serialize request");
        assert_eq!(json["model"], "google/gemini-flash-1.5");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn response_body_parses_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"42"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("parse response");
        assert_eq!(parsed.choices[0].message.content, "42");
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        std::env::remove_var("OPENROUTER_API_KEY");
        let err = OpenRouterClient::from_env("google/gemini-flash-1.5")
            .err()
            .expect("missing key should fail");
        assert!(matches!(err, ProviderError::Config(_)));
    }
}
