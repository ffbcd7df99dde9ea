//! OpenAI-compatible chat completions adapter.
//!
//! Talks to any server exposing `POST {base_url}/chat/completions`
//! (OpenAI, Ollama's `/v1`, vLLM, SiliconFlow).

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, trace};
use trial_application::{ChatMessage, GatewayError, LlmGateway};
use trial_domain::Model;

static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("reasoning pattern is valid")
});

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`LlmGateway`] backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: Option<u32>,
    strip_reasoning: bool,
}

impl OpenAiGateway {
    pub fn new(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            strip_reasoning: config.strip_reasoning,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared HTTP client, reused by the embedding adapter.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

/// Client with the per-request timeout applied.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Remove reasoning blocks emitted by thinking models.
pub fn strip_reasoning(text: &str) -> String {
    REASONING_BLOCK.replace_all(text, "").trim().to_string()
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn chat(&self, model: &Model, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: model.as_str(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(model = %model, messages = messages.len(), "chat request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::ModelNotAvailable(model.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;

        trace!(chars = content.chars().count(), "chat response");

        if self.strip_reasoning {
            Ok(strip_reasoning(&content))
        } else {
            Ok(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use serde_json::json;

    fn gateway(base_url: String) -> OpenAiGateway {
        OpenAiGateway::new(&FileProviderConfig {
            base_url,
            api_key: Some("sk-test".to_string()),
            timeout_secs: 5,
            max_tokens: Some(512),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_strip_reasoning() {
        let text = "<think>\n先分析证据 {\"x\":1}\n</think>\n\n本庭认为……";
        assert_eq!(strip_reasoning(text), "本庭认为……");
        assert_eq!(strip_reasoning("无推理"), "无推理");
    }

    #[tokio::test]
    async fn test_chat_sends_openai_request() {
        let (base_url, captured) = serve_once(
            200,
            json!({"choices": [{"message": {"role": "assistant", "content": "<think>x</think>现在开庭。"}}]}),
        )
        .await;
        let gw = gateway(base_url);

        let reply = gw
            .chat(
                &Model::new("qwen3:8b"),
                &[
                    ChatMessage::system("你是一名法官。"),
                    ChatMessage::user("请开庭"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(reply, "现在开庭。");

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("POST /v1/chat/completions"));
        assert!(
            request
                .head
                .to_lowercase()
                .contains("authorization: bearer sk-test")
        );
        assert_eq!(request.body["model"], "qwen3:8b");
        assert_eq!(request.body["max_tokens"], 512);
        assert_eq!(request.body["messages"][0]["role"], "system");
        assert_eq!(request.body["messages"][1]["content"], "请开庭");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_model_unavailable() {
        let (base_url, _captured) = serve_once(404, json!({"error": "model not found"})).await;
        let err = gateway(base_url)
            .chat(&Model::new("missing"), &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ModelNotAvailable(m) if m == "missing"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_request_failed() {
        let (base_url, _captured) = serve_once(500, json!({"error": "boom"})).await;
        let err = gateway(base_url)
            .chat(&Model::default(), &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(m) if m.contains("500")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let (base_url, _captured) = serve_once(200, json!({"choices": []})).await;
        let err = gateway(base_url)
            .chat(&Model::default(), &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = gateway(format!("http://{}/v1", addr))
            .chat(&Model::default(), &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
