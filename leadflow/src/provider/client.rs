//! Chat-completions client for the intelligence provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProviderConfig;
use crate::errors::{ConfigError, ProviderError};

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The message role ("system" or "user").
    pub role: String,
    /// The message content.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completion request.
///
/// When `model` is unset the provider substitutes its configured default.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model override; `None` uses the provider's configured model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a request with the given messages.
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Overrides the model for this request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the generation token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The external text-generation service.
///
/// Implementations return the first choice's message content; everything
/// else about the response is an implementation detail.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Sends a completion request and returns the response text.
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError>;
}

/// HTTP implementation of [`Provider`] against a chat-completions API.
pub struct HttpProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Creates a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ProviderConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ConfigError::HttpClient {
                reason: err.to_string(),
            })?;

        Ok(Self { client, config })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The API key with all but the edges masked, for diagnostics.
    #[must_use]
    pub fn api_key_masked(&self) -> String {
        let key = &self.config.api_key;
        if key.len() <= 8 {
            "*".repeat(key.len())
        } else {
            format!("{}...{}", &key[..4], &key[key.len() - 4..])
        }
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &self.api_key_masked())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let wire = WireRequest {
            model: request
                .model
                .unwrap_or_else(|| self.config.model.clone()),
            messages: request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&wire)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::Timeout {
                        seconds: self.config.timeout_seconds,
                    }
                } else {
                    ProviderError::Request(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Malformed("response contained no choices".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ProviderConfig {
        ProviderConfig::new("pplx-0123456789abcdef", "sonar-pro")
    }

    #[test]
    fn test_api_key_masked() {
        let provider = HttpProvider::new(test_config()).unwrap();
        assert_eq!(provider.api_key_masked(), "pplx...cdef");
    }

    #[test]
    fn test_api_key_masked_short() {
        let provider = HttpProvider::new(ProviderConfig::new("abc", "m")).unwrap();
        assert_eq!(provider.api_key_masked(), "***");
    }

    #[test]
    fn test_chat_request_serialization_skips_unset_fields() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]).with_temperature(0.1);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"temperature\":0.1"));
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("model"));
    }

    #[test]
    fn test_wire_response_deserialization() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#;
        let response: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
    }

    #[tokio::test]
    async fn test_connection_error_surfaces_as_request_error() {
        let config = test_config().with_base_url("http://127.0.0.1:59999");
        let provider = HttpProvider::new(config).unwrap();

        let result = provider
            .complete(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await;

        assert!(matches!(
            result,
            Err(ProviderError::Request(_) | ProviderError::Timeout { .. })
        ));
    }
}
