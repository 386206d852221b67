//! LLM-backed anomaly explanations
//!
//! Best-effort natural-language explanations for anomalous predictions via
//! an OpenAI-compatible chat API. BYOK (bring your own key) model - API keys
//! come from environment variables, and every failure downgrades to a
//! deterministic heuristic sentence instead of failing the prediction.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` / `GROK_API_KEY` / `XAI_API_KEY`: credential chain,
//!   first one found wins
//! - `LLM_PROVIDER`: provider selector (default: openai)
//! - `OPENAI_MODEL`: model override for the selected provider

mod client;
mod explain;

pub use client::{ExplainConfig, ExplanationClient, LlmProvider, API_KEY_VARS};
pub use explain::{anomaly_prompt, heuristic_explanation, request_explanation};

use thiserror::Error;

/// Errors that can occur while requesting an explanation
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("Missing API key: set OPENAI_API_KEY, GROK_API_KEY, or XAI_API_KEY")]
    MissingApiKey,

    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

pub type ExplainResult<T> = Result<T, ExplainError>;
