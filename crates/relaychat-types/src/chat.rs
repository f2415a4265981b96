//! Conversation turn, UI stream chunk, and request status types.
//!
//! These types model the client-facing side of the relay: the turns the chat
//! surface holds and re-sends on every request, the chunk protocol the relay
//! endpoint streams back, and the status flags that gate new input.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use std::fmt;

// Turns use the same role vocabulary as provider messages.
pub use crate::llm::MessageRole;

/// SSE payload that terminates a UI message stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Response header announcing the UI message stream protocol version.
pub const UI_MESSAGE_STREAM_HEADER: &str = "x-vercel-ai-ui-message-stream";

/// Protocol version sent in [`UI_MESSAGE_STREAM_HEADER`].
pub const UI_MESSAGE_STREAM_VERSION: &str = "v1";

/// One typed content part of a conversation turn.
///
/// Only `text` parts carry meaning for the relay. Every other part type
/// (`file`, `reasoning`, `tool-*`, `step-start`, ...) is kept verbatim in
/// [`MessagePart::Other`] so it survives a round trip through the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text { text: String },
    Other { kind: String, payload: Value },
}

impl MessagePart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    /// Text content, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text { text } => Some(text),
            MessagePart::Other { .. } => None,
        }
    }
}

impl Serialize for MessagePart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MessagePart::Text { text } => {
                serde_json::json!({ "type": "text", "text": text }).serialize(serializer)
            }
            MessagePart::Other { payload, .. } => payload.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MessagePart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?
            .to_string();

        if kind == "text" {
            let text = value
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| D::Error::missing_field("text"))?;
            return Ok(MessagePart::Text {
                text: text.to_string(),
            });
        }

        Ok(MessagePart::Other {
            kind,
            payload: value,
        })
    }
}

/// One conversation turn as the chat surface holds it and sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessage {
    /// Stable identifier used for rendering and reconciliation.
    #[serde(default)]
    pub id: String,
    pub role: MessageRole,
    pub parts: Vec<MessagePart>,
}

impl UiMessage {
    /// Create a user turn holding a single text part.
    pub fn user_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            parts: vec![MessagePart::text(text)],
        }
    }

    /// Concatenated text of all text parts, in order.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(MessagePart::as_text).collect()
    }
}

/// Request body accepted by the relay endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<UiMessage>,
}

/// One chunk of the UI message stream relayed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiStreamChunk {
    Start {
        #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    StartStep,
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    FinishStep,
    /// Completion marker. A stream that ends without it has failed.
    Finish,
    Error {
        #[serde(rename = "errorText")]
        error_text: String,
    },
    /// Any chunk type this client does not interpret.
    #[serde(other)]
    Unknown,
}

/// Status of the chat surface's relay call lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Ready,
    Submitted,
    Streaming,
    Error,
}

impl ChatStatus {
    /// Whether a new submission may start from this status.
    ///
    /// `Error` accepts input: the next accepted submission is the implicit
    /// reset back into the normal cycle.
    pub fn accepts_input(self) -> bool {
        matches!(self, ChatStatus::Ready | ChatStatus::Error)
    }

    /// Whether a relay call is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, ChatStatus::Submitted | ChatStatus::Streaming)
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatStatus::Ready => write!(f, "ready"),
            ChatStatus::Submitted => write!(f, "submitted"),
            ChatStatus::Streaming => write!(f, "streaming"),
            ChatStatus::Error => write!(f, "error"),
        }
    }
}
