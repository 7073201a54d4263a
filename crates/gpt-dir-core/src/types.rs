use serde::{Deserialize, Serialize};

// ============================================================================
// API Types - Request/Response structures for the chat-completions API
// ============================================================================

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged entry in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

// ============================================================================
// Stream Types - one SSE payload of an incremental completion
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatChunk {
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::system("be helpful");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"system""#));
    }

    #[test]
    fn test_request_omits_unset_max_tokens() {
        let request = ChatRequest {
            model: "gpt-4".to_string(),
            messages: vec![Message::user("hi")],
            temperature: 1.0,
            max_tokens: None,
            stream: true,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(json.contains(r#""stream":true"#));
    }

    #[test]
    fn test_request_includes_set_max_tokens() {
        let request = ChatRequest {
            model: "gpt-4".to_string(),
            messages: vec![],
            temperature: 0.2,
            max_tokens: Some(256),
            stream: true,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""max_tokens":256"#));
    }

    #[test]
    fn test_chunk_deserializes_delta_content() {
        let chunk: ChatChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}"#)
                .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
    }

    #[test]
    fn test_chunk_tolerates_empty_delta() {
        let chunk: ChatChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}
