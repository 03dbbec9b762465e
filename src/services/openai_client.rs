use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};

/// Chat-completion client with fixed model and sampling parameters.
///
/// Issues exactly one request per call. Retrying transport failures is left
/// to the caller.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIClient {
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PlannerError::Config(
                "completion API key must not be empty".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the first choice's text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest::new(&self.model, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .into_value();

        let request_url = build_chat_url(&self.base_url);
        debug!(
            target: "itinerary::completion",
            url = %request_url,
            model = %self.model,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let response = self
            .http
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Transport(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Transport(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            warn!(
                target: "itinerary::completion",
                status = status.as_u16(),
                "completion endpoint returned an error"
            );
            return Err(PlannerError::Upstream {
                status: status.as_u16(),
                body: upstream_message(&response_text),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&response_text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(PlannerError::EmptyCompletion)?;

        debug!(
            target: "itinerary::completion",
            response_chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}

/// Prefer the API's `error.message`, fall back to the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    prompt: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": self.prompt }],
        });

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_url() {
        assert_eq!(
            build_chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("http://localhost/v1/chat/completions"),
            "http://localhost/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest::new("gpt", "plan my trip")
            .with_temperature(0.7)
            .with_max_tokens(4000)
            .into_value();
        assert_eq!(body["model"], "gpt");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "plan my trip");
        assert_eq!(body["max_tokens"], 4000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_upstream_message_extraction() {
        assert_eq!(
            upstream_message(r#"{"error":{"message":"invalid key"}}"#),
            "invalid key"
        );
        assert_eq!(upstream_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_empty_key_is_config_error() {
        let err = OpenAIClient::new(&PlannerConfig::new("  ")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "max_tokens": 4000,
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"[]"}},{"message":{"content":"ignored"}}]}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new(&PlannerConfig::new("test-key").with_base_url(server.url()))
            .unwrap();
        let content = client.complete("hello").await.unwrap();
        assert_eq!(content, "[]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key"}}"#)
            .create_async()
            .await;

        let client =
            OpenAIClient::new(&PlannerConfig::new("k").with_base_url(server.url())).unwrap();
        match client.complete("hi").await {
            Err(PlannerError::Upstream { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/v2/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let client =
            OpenAIClient::new(&PlannerConfig::new("k").with_base_url(server.url())).unwrap();
        assert!(matches!(
            client.complete("hi").await,
            Err(PlannerError::EmptyCompletion)
        ));

        let blank = OpenAIClient::new(
            &PlannerConfig::new("k").with_base_url(format!("{}/v2", server.url())),
        )
        .unwrap();
        assert!(matches!(
            blank.complete("hi").await,
            Err(PlannerError::EmptyCompletion)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let client = OpenAIClient::new(
            &PlannerConfig::new("k")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        let err = client.complete("hi").await.unwrap_err();
        assert!(matches!(err, PlannerError::Transport(_)));
        assert!(err.is_retryable());
    }
}
