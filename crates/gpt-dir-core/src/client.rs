use std::io::{BufRead, BufReader, Read};

use thiserror::Error;

use crate::types::{ChatChunk, ChatRequest};

/// Default endpoint for the chat-completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors that can occur while talking to the remote API.
///
/// None of these are recovered: a failed call terminates the session.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key was absent from the environment at startup.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    /// Transport or HTTP-level failure.
    #[error("chat completion request failed: {0}")]
    Request(String),
    /// The stream carried a payload that does not parse as a completion chunk.
    #[error("malformed stream payload: {0}")]
    MalformedResponse(String),
    /// Reading the response body failed mid-stream.
    #[error("stream read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking client for an OpenAI-style streaming chat-completions endpoint.
///
/// The key is an explicit configuration value rather than ambient process
/// state; a missing key only surfaces when a request is issued.
pub struct ChatClient {
    api_key: Option<String>,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue a streaming completion request and hand back the fragment stream.
    pub fn stream_completion(&self, request: &ChatRequest) -> Result<CompletionStream, ApiError> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;

        let response = ureq::post(&format!("{}/chat/completions", self.base_url))
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", api_key))
            .send_json(request)
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(CompletionStream::from_reader(response.into_reader()))
    }
}

/// Lazy, finite, non-restartable sequence of response fragments.
///
/// Decodes server-sent-event lines (`data: {json}`) from the response body;
/// `data: [DONE]` ends the stream. Payloads without delta content (role
/// announcements, finish markers) are skipped.
pub struct CompletionStream {
    reader: Box<dyn BufRead>,
    done: bool,
}

impl CompletionStream {
    /// Decode fragments from any byte source. The HTTP client uses the
    /// response body; tests use in-memory fixtures.
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self {
            reader: Box::new(BufReader::new(reader)),
            done: false,
        }
    }
}

impl Iterator for CompletionStream {
    type Item = Result<String, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }

            let Some(payload) = line.trim_end().strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim_start();

            if payload == "[DONE]" {
                self.done = true;
                return None;
            }

            let chunk: ChatChunk = match serde_json::from_str(payload) {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.done = true;
                    return Some(Err(ApiError::MalformedResponse(format!(
                        "{}: {}",
                        e, payload
                    ))));
                }
            };

            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content);
            if let Some(text) = content {
                if !text.is_empty() {
                    return Some(Ok(text));
                }
            }
        }
        None
    }
}
