//! ChatTransport trait: how the chat surface reaches the relay endpoint.

use std::pin::Pin;

use futures_util::Stream;

use relaychat_types::chat::{UiMessage, UiStreamChunk};
use relaychat_types::error::ChatError;

/// Boxed stream of decoded UI chunks, or the error that ended it.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<UiStreamChunk, ChatError>> + Send + 'static>>;

/// One relay call per invocation.
///
/// Implementations send the full history and yield the reply's chunks in
/// arrival order. Connection failures and non-2xx responses surface as the
/// first item of the stream. Implementations live in relaychat-infra
/// (e.g., `HttpChatTransport`).
pub trait ChatTransport: Send + Sync {
    fn send_messages(&self, messages: Vec<UiMessage>) -> ChunkStream;
}
