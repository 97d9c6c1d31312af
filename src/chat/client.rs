use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ChatMessage, ChatPayload};

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Cannot reach chat API at {0}")]
    Connection(String),

    #[error("Chat API request timed out after {0}s")]
    Timeout(u64),

    #[error("Chat API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Cannot parse chat API response: {0}")]
    ResponseParsing(String),

    #[error("Chat API response contained no choices")]
    MissingAnswer,

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Seam to the external completion API. The bearer credential is supplied
/// per call and never stored by implementations.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send the message list and return the assistant's answer text.
    async fn complete(
        &self,
        credential: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ChatError>;
}

/// HTTP client for an OpenAI-style chat-completions endpoint.
pub struct OpenAiClient {
    url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(url: &str, model: &str, temperature: f32, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: url.to_string(),
            model: model.to_string(),
            temperature,
            client,
            timeout_secs,
        }
    }
}

/// Response body from the completions endpoint; only the fields we read.
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

fn extract_answer(response: CompletionResponse) -> Result<String, ChatError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ChatError::MissingAnswer)
}

#[async_trait]
impl ChatApi for OpenAiClient {
    async fn complete(
        &self,
        credential: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ChatError> {
        let payload = ChatPayload {
            model: self.model.clone(),
            temperature: self.temperature,
            messages,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(credential)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChatError::Connection(self.url.clone())
                } else if e.is_timeout() {
                    ChatError::Timeout(self.timeout_secs)
                } else {
                    ChatError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::ResponseParsing(e.to_string()))?;

        extract_answer(parsed)
    }
}

/// Mock chat API for tests — returns a configured answer and records the
/// message lists it was asked to complete.
pub struct MockChatApi {
    answer: Option<String>,
    calls: std::sync::Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatApi {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Message lists seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for MockChatApi {
    async fn complete(
        &self,
        _credential: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(messages);
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(ChatError::Api {
                status: 500,
                body: "mock failure".into(),
            }),
        }
    }
}
