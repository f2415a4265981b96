//! Relay request construction and response encoding.
//!
//! The relay is stateless: every call receives the full history, builds one
//! provider request from it with the fixed model settings below, and
//! re-encodes the provider's events as UI stream chunks.

pub mod convert;
pub mod ui_stream;

use relaychat_types::chat::UiMessage;
use relaychat_types::llm::CompletionRequest;

use self::convert::convert_to_model_messages;

/// Model every relay call is sent to.
pub const MODEL: &str = "gemini-2.5-flash";

/// System instruction prepended to every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Sampling temperature for every relay call.
pub const TEMPERATURE: f64 = 0.7;

/// The only error text a caller ever sees for provider-side failures.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Build the provider request for one relay call from the client's history.
pub fn build_completion_request(turns: &[UiMessage]) -> CompletionRequest {
    let prompt = convert_to_model_messages(SYSTEM_PROMPT, turns);

    CompletionRequest {
        model: MODEL.to_string(),
        messages: prompt.messages,
        system: Some(prompt.system),
        max_tokens: None,
        temperature: Some(TEMPERATURE),
    }
}
