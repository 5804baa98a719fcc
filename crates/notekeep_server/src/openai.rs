//! OpenAI-compatible chat completion backend.
//!
//! # Invariants
//! - Every call is bounded by the prompt's timeout.
//! - The blocking client is created and dropped inside `complete`, which
//!   always runs on a blocking worker thread.

use crate::config::AiSettings;
use notekeep_core::{ModelBackend, ModelError, ModelPrompt};
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiChatBackend {
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiChatBackend {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Returns `None` when no API key is configured.
    pub fn from_settings(settings: &AiSettings) -> Option<Self> {
        let api_key = settings.api_key.as_deref()?;
        Some(Self::new(api_key, settings.model.as_str(), settings.endpoint.as_str()))
    }

    fn request_body<'a>(&'a self, prompt: &'a ModelPrompt) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
        }
    }
}

impl ModelBackend for OpenAiChatBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete(&self, prompt: &ModelPrompt) -> Result<String, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(prompt.timeout)
            .build()
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        let response = client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(ModelError::Status {
                code: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        decode_completion(&body)
    }
}

fn map_transport_error(err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Transport(err.to_string())
    }
}

/// Extracts the first choice's text from a chat completion body.
fn decode_completion(body: &str) -> Result<String, ModelError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|err| ModelError::MalformedReply(err.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ModelError::EmptyReply)
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
