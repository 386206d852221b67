//! Chat-completions client for anomaly explanations
//!
//! One bounded request per call via ureq (sync HTTP), no retries, no
//! streaming. Both supported providers speak the OpenAI chat API.

use crate::ai::{ExplainError, ExplainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Credential chain checked in order; the first variable set wins
pub const API_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "GROK_API_KEY", "XAI_API_KEY"];

/// Supported explanation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Xai,
}

impl LlmProvider {
    /// Parse an LLM_PROVIDER selector value
    pub fn parse(name: &str) -> ExplainResult<Self> {
        match name.to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "xai" | "grok" => Ok(LlmProvider::Xai),
            other => Err(ExplainError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Xai => "grok-2-latest",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmProvider::Xai => "https://api.x.ai/v1/chat/completions",
        }
    }

    /// Human-facing provider name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OpenAI",
            LlmProvider::Xai => "xAI",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request parameters for one explanation call
#[derive(Debug, Clone)]
pub struct ExplainConfig {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            max_tokens: 200,
            temperature: 0.3,
        }
    }
}

impl ExplainConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Explanation client, sync HTTP via ureq (no tokio needed here)
pub struct ExplanationClient {
    config: ExplainConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl ExplanationClient {
    pub fn new(config: ExplainConfig, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            agent: make_agent(timeout),
        }
    }

    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    /// One chat completion: system prompt + user prompt in, trimmed text out
    pub fn complete(&self, system: &str, user: &str) -> ExplainResult<String> {
        let body = ChatRequest {
            model: self.config.model().to_string(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .agent
            .post(self.config.provider.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| ExplainError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(ExplainError::ApiError {
                status,
                message: error_text,
            });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| ExplainError::ParseError(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| ExplainError::ParseError("no response choices".to_string()))
    }
}

// OpenAI chat API types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        assert_eq!(LlmProvider::OpenAi.default_model(), "gpt-4o-mini");
        assert_eq!(LlmProvider::Xai.default_model(), "grok-2-latest");
        assert_eq!(LlmProvider::default(), LlmProvider::OpenAi);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(LlmProvider::parse("openai").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse("grok").unwrap(), LlmProvider::Xai);
        assert_eq!(LlmProvider::parse("xai").unwrap(), LlmProvider::Xai);
        assert!(matches!(
            LlmProvider::parse("mistral"),
            Err(ExplainError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_config_model_override() {
        let config = ExplainConfig::default();
        assert_eq!(config.model(), "gpt-4o-mini");

        let config = ExplainConfig {
            model: Some("gpt-4.1".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "gpt-4.1");
    }

    #[test]
    fn test_config_request_bounds() {
        let config = ExplainConfig::default();
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::system("hi")).unwrap();
        assert_eq!(json["role"], "system");
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
    }
}
