//! Runtime configuration
//!
//! Supports loading config from:
//! - Environment variables (highest priority)
//! - ~/.config/pricesage/config.toml
//! - Built-in defaults
//!
//! CLI flags override the merged result at the call site.

use crate::ai::{
    ExplainConfig, ExplainError, ExplainResult, ExplanationClient, LlmProvider, API_KEY_VARS,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Bundled artifact path, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/laptop_price_regression.json";
pub const DEFAULT_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// On-disk user config; every field is optional
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ai: AiSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerSection {
    pub model_path: Option<PathBuf>,
    pub addr: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AiSection {
    pub api_key: Option<String>,
    /// "openai" (default) or "xai"
    pub provider: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Settings for the explanation provider, resolved but not yet validated.
/// Validation happens when a client is built, so a missing key only matters
/// once an anomaly actually asks for an explanation.
#[derive(Debug, Clone)]
pub struct ExplainSettings {
    pub api_key: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ExplainSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: None,
            model: None,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl ExplainSettings {
    /// Build a client from these settings. Fails when no credential is
    /// configured or the provider selector is unknown.
    pub fn client(&self) -> ExplainResult<ExplanationClient> {
        let api_key = self.api_key.clone().ok_or(ExplainError::MissingApiKey)?;
        let provider = match self.provider.as_deref() {
            Some(name) => LlmProvider::parse(name)?,
            None => LlmProvider::default(),
        };
        let config = ExplainConfig {
            provider,
            model: self.model.clone(),
            ..Default::default()
        };
        Ok(ExplanationClient::new(
            config,
            api_key,
            Duration::from_secs(self.timeout_secs),
        ))
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub addr: String,
    pub port: u16,
    pub explain: ExplainSettings,
}

impl AppConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/pricesage/config.toml)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        let file = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<FileConfig>(&content).ok())
            .unwrap_or_default();

        Ok(Self::from_sources(file, |name| std::env::var(name).ok()))
    }

    /// Merge a file config with an environment lookup. The lookup is
    /// injectable so merging stays testable without touching process env.
    pub fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let model_path = env("PRICESAGE_MODEL")
            .map(PathBuf::from)
            .or(file.server.model_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let addr = env("PRICESAGE_ADDR")
            .or(file.server.addr)
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let port = env("PRICESAGE_PORT")
            .and_then(|p| p.parse().ok())
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let api_key = first_env(API_KEY_VARS, &env).or(file.ai.api_key);
        let provider = env("LLM_PROVIDER").or(file.ai.provider);
        let model = env("OPENAI_MODEL").or(file.ai.model);
        let timeout_secs = env("PRICESAGE_LLM_TIMEOUT_SECS")
            .and_then(|t| t.parse().ok())
            .or(file.ai.timeout_secs)
            .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);

        Self {
            model_path,
            addr,
            port,
            explain: ExplainSettings {
                api_key,
                provider,
                model,
                timeout_secs,
            },
        }
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pricesage").join("config.toml"))
    }
}

/// First of `names` for which the lookup returns a value
fn first_env(names: &[&str], env: impl Fn(&str) -> Option<String>) -> Option<String> {
    names.iter().find_map(|name| env(name))
}

/// Name of the credential variable currently set in the process env, if any
pub fn active_key_var() -> Option<&'static str> {
    API_KEY_VARS
        .iter()
        .copied()
        .find(|name| std::env::var(name).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::from_sources(FileConfig::default(), no_env);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.explain.api_key.is_none());
        assert!(config.explain.provider.is_none());
        assert_eq!(config.explain.timeout_secs, 30);
    }

    #[test]
    fn test_credential_chain_first_found_wins() {
        let env = |name: &str| match name {
            "GROK_API_KEY" => Some("grok-key".to_string()),
            "XAI_API_KEY" => Some("xai-key".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(FileConfig::default(), env);
        assert_eq!(config.explain.api_key.as_deref(), Some("grok-key"));

        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("openai-key".to_string()),
            "GROK_API_KEY" => Some("grok-key".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(FileConfig::default(), env);
        assert_eq!(config.explain.api_key.as_deref(), Some("openai-key"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
[server]
model_path = "custom/model.json"
port = 9000

[ai]
api_key = "file-key"
model = "file-model"
"#,
        )
        .unwrap();

        let env = |name: &str| match name {
            "PRICESAGE_MODEL" => Some("env/model.json".to_string()),
            "OPENAI_MODEL" => Some("env-model".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(file, env);
        assert_eq!(config.model_path, PathBuf::from("env/model.json"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.explain.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.explain.model.as_deref(), Some("env-model"));
    }

    #[test]
    fn test_env_port_and_timeout_parse() {
        let env = |name: &str| match name {
            "PRICESAGE_PORT" => Some("3100".to_string()),
            "PRICESAGE_LLM_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(FileConfig::default(), env);
        assert_eq!(config.port, 3100);
        assert_eq!(config.explain.timeout_secs, 5);

        // Unparseable values fall through to defaults
        let env = |name: &str| match name {
            "PRICESAGE_PORT" => Some("not-a-port".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(FileConfig::default(), env);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_client_requires_api_key() {
        let settings = ExplainSettings::default();
        assert!(matches!(
            settings.client(),
            Err(ExplainError::MissingApiKey)
        ));
    }

    #[test]
    fn test_client_rejects_unknown_provider() {
        let settings = ExplainSettings {
            api_key: Some("sk-test".to_string()),
            provider: Some("mistral".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.client(),
            Err(ExplainError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_client_resolves_provider_and_model() {
        let settings = ExplainSettings {
            api_key: Some("sk-test".to_string()),
            provider: None,
            model: None,
            ..Default::default()
        };
        let client = settings.client().unwrap();
        assert_eq!(client.provider(), LlmProvider::OpenAi);
        assert_eq!(client.model(), "gpt-4o-mini");

        let settings = ExplainSettings {
            api_key: Some("sk-test".to_string()),
            provider: Some("grok".to_string()),
            model: Some("grok-3".to_string()),
            ..Default::default()
        };
        let client = settings.client().unwrap();
        assert_eq!(client.provider(), LlmProvider::Xai);
        assert_eq!(client.model(), "grok-3");
    }

    #[test]
    fn test_file_config_minimal_toml() {
        let file: FileConfig = toml::from_str("").unwrap();
        assert!(file.server.model_path.is_none());
        assert!(file.ai.api_key.is_none());
    }
}
