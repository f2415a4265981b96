//! LlmProvider trait definition.
//!
//! This is the core abstraction that the upstream model provider implements.
//! `stream` returns `Pin<Box<dyn Stream>>` so the trait stays object-safe
//! for the `BoxLlmProvider` wrapper.

use std::pin::Pin;

use futures_util::Stream;

use relaychat_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of provider events.
pub type LlmStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends.
///
/// Implementations live in relaychat-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// Connection and HTTP status failures surface as the first item of the
    /// stream, not as a separate error path.
    fn stream(&self, request: CompletionRequest) -> LlmStream;
}
