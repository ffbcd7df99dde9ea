//! Chat backend configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat backend.
///
/// Works against OpenAI itself, a local Ollama server (`/v1`), vLLM or any
/// other server that speaks `/chat/completions` and `/embeddings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL including the version prefix, e.g. `http://localhost:11434/v1`.
    pub base_url: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional completion length cap.
    pub max_tokens: Option<u32>,
    /// Drop `<think>...</think>` reasoning blocks from replies.
    pub strip_reasoning: bool,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: 1.0,
            timeout_secs: 300,
            max_tokens: None,
            strip_reasoning: true,
        }
    }
}

impl FileProviderConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }
}
