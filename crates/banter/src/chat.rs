use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Assistant,
}

/// One entry of the conversation history, in the same schema the server
/// expects inside the request's `messages` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<(&str, &str)> for ChatMessage {
    fn from((role, content): (&str, &str)) -> Self {
        match role {
            "user" => ChatMessage::user(content),
            "assistant" => ChatMessage::assistant(content),
            _ => panic!("Invalid role"),
        }
    }
}

/// One conversation turn to be sent to the server: the accumulated history
/// plus the new prompt as the final `user` message.
///
/// Field order matters: the serialized body is `model`, `stream`, `messages`.
#[derive(Debug, Serialize, Deserialize, Builder)]
#[builder(pattern = "mutable")]
#[builder(setter(into))]
pub struct ChatRequest {
    pub model: String,
    pub stream: bool,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Formats the complete POST envelope for this request.
    ///
    /// The body is serialized first and `Content-Length` is measured from
    /// the serialized bytes, never estimated.
    pub fn to_post_request(&self, host: &str, endpoint: &str) -> Result<String> {
        let body = serde_json::to_string(self)?;
        Ok(format!(
            "POST {endpoint} HTTP/1.1\r\n\
             Host: {host}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             \r\n\
             {body}",
            body.len()
        ))
    }
}

/// Extracts the assistant text fragment from one decoded JSON unit.
///
/// A unit is expected to look like `{"message":{"content":"..."}}`; other
/// fields are ignored. A unit without a `message.content` string yields an
/// empty fragment. A unit that is not valid JSON at all is protocol-level
/// corruption and fails with [`crate::Error::DecodeError`].
pub fn fragment_from_unit(unit: &[u8]) -> Result<String> {
    let value: serde_json::Value = serde_json::from_slice(unit)?;
    Ok(value
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string())
}
