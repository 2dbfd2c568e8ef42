//! Generation capability seam.
//!
//! The provider is modeled as an async trait so the normalizer stays
//! decoupled from transport and vendor wire shapes, and so tests can script
//! outcomes with a fake client. One attempt per request; the only timeout is
//! the bounded one on the HTTP client itself.

use crate::config::OracleConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Provider failure taxonomy. The normalizer matches this exhaustively to
/// pick a degradation tier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider returned status {status}")]
    Status { status: u16, body: String },

    /// The request never completed (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Transport succeeded but no text could be located in the envelope.
    #[error("unrecognized response envelope")]
    Envelope(String),
}

/// Generic generation client: prompt in, content text out.
#[async_trait]
pub trait GenerateClient: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

// ============================================================================
// OpenAI-backed client
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// The closed set of envelope shapes the provider may answer with:
/// chat-completions style and responses style. Anything else is an
/// [`ProviderError::Envelope`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyEnvelope {
    Chat { choices: Vec<ChatChoice> },
    Responses { output: Vec<OutputItem> },
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    text: Option<String>,
}

fn extract_text(envelope: ReplyEnvelope) -> Option<String> {
    match envelope {
        ReplyEnvelope::Chat { choices } => choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content),
        ReplyEnvelope::Responses { output } => output
            .into_iter()
            .flat_map(|item| item.content)
            .find_map(|content| content.text),
    }
    .filter(|text| !text.trim().is_empty())
}

fn parse_reply(raw: &str) -> Result<String, ProviderError> {
    let envelope: ReplyEnvelope =
        serde_json::from_str(raw).map_err(|_| ProviderError::Envelope(raw.to_string()))?;
    extract_text(envelope).ok_or_else(|| ProviderError::Envelope(raw.to_string()))
}

/// Chat-completions client with strict-JSON output requested.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from config. `None` when no credential is present.
    pub fn from_config(config: &OracleConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerateClient for OpenAiClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!("[>]  provider call [{}] {}", self.model, url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!("[-]  provider error {} ({} chars)", status, raw.len());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        debug!("[<]  provider response ({} chars)", raw.len());
        parse_reply(&raw)
    }
}

// ============================================================================
// Fake client for tests
// ============================================================================

/// Scripted generation client. Responses are consumed in order; the last one
/// repeats once the script runs out, matching how a stalled provider keeps
/// answering the same way.
pub struct FakeGenerateClient {
    responses: Mutex<Vec<Result<String, ProviderError>>>,
    call_count: Mutex<usize>,
}

impl FakeGenerateClient {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// A client that always returns the given content text.
    pub fn always(content: &str) -> Self {
        Self::new(vec![Ok(content.to_string())])
    }

    /// A client that always returns the given error.
    pub fn always_error(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl GenerateClient for FakeGenerateClient {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::Envelope(String::new()));
        }
        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_envelope() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"odds\": 70}"}}]}"#;
        assert_eq!(parse_reply(raw).unwrap(), r#"{"odds": 70}"#);
    }

    #[test]
    fn test_parse_responses_envelope() {
        let raw = r#"{"output": [{"content": [{"type": "output_text", "text": "hello"}]}]}"#;
        assert_eq!(parse_reply(raw).unwrap(), "hello");
    }

    #[test]
    fn test_parse_unknown_envelope_fails() {
        let raw = r#"{"result": "something else entirely"}"#;
        assert!(matches!(
            parse_reply(raw),
            Err(ProviderError::Envelope(_))
        ));
    }

    #[test]
    fn test_parse_non_json_envelope_fails() {
        assert!(matches!(
            parse_reply("<html>504</html>"),
            Err(ProviderError::Envelope(_))
        ));
    }

    #[test]
    fn test_parse_chat_envelope_with_null_content_fails() {
        let raw = r#"{"choices": [{"message": {"content": null}}]}"#;
        assert!(matches!(
            parse_reply(raw),
            Err(ProviderError::Envelope(_))
        ));
    }

    #[test]
    fn test_parse_chat_envelope_with_empty_choices_fails() {
        let raw = r#"{"choices": []}"#;
        assert!(matches!(
            parse_reply(raw),
            Err(ProviderError::Envelope(_))
        ));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        assert!(OpenAiClient::from_config(&OracleConfig::default()).is_none());

        let config = OracleConfig {
            api_key: Some("sk-test".to_string()),
            ..OracleConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.model, "gpt-4o-mini");
        assert_eq!(client.endpoint, "https://api.openai.com");
    }

    #[test]
    fn test_from_config_strips_trailing_slash() {
        let config = OracleConfig {
            api_key: Some("sk-test".to_string()),
            endpoint: "https://llm.internal/".to_string(),
            ..OracleConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint, "https://llm.internal");
    }

    #[tokio::test]
    async fn test_fake_client_scripted_responses() {
        let client = FakeGenerateClient::new(vec![
            Ok("first".to_string()),
            Err(ProviderError::Status {
                status: 429,
                body: "rate limited".to_string(),
            }),
        ]);

        assert_eq!(client.generate("s", "u").await.unwrap(), "first");
        assert!(matches!(
            client.generate("s", "u").await,
            Err(ProviderError::Status { status: 429, .. })
        ));
        // Script exhausted down to one entry; it repeats.
        assert!(client.generate("s", "u").await.is_err());
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fake_client_always() {
        let client = FakeGenerateClient::always("{}");
        assert_eq!(client.generate("s", "u").await.unwrap(), "{}");
        assert_eq!(client.generate("s", "u").await.unwrap(), "{}");
        assert_eq!(client.call_count(), 2);
    }
}
