//! Provider events to UI stream chunks.
//!
//! The relay answers with a single assistant message made of one step:
//!
//! ```text
//! start -> start-step -> (text-start -> text-delta* -> text-end)? -> finish-step -> finish
//! ```
//!
//! A provider failure mid-stream replaces the tail with one `error` chunk. When
//! the duration bound elapses the stream simply stops; the missing `finish`
//! tells the client the reply is incomplete.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use tokio::time::Instant;

use relaychat_types::chat::UiStreamChunk;
use relaychat_types::llm::StreamEvent;

use super::GENERIC_ERROR_MESSAGE;
use crate::llm::provider::LlmStream;

/// Boxed stream of UI chunks.
pub type UiChunkStream = Pin<Box<dyn Stream<Item = UiStreamChunk> + Send + 'static>>;

/// Stateful encoder for one assistant reply.
pub struct UiStreamEncoder {
    message_id: String,
    next_part: u32,
    open_part: Option<String>,
    finished: bool,
}

impl UiStreamEncoder {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            next_part: 0,
            open_part: None,
            finished: false,
        }
    }

    /// Chunks that open the reply.
    pub fn start(&self) -> Vec<UiStreamChunk> {
        vec![
            UiStreamChunk::Start {
                message_id: Some(self.message_id.clone()),
            },
            UiStreamChunk::StartStep,
        ]
    }

    /// Encode one provider event. Events that carry nothing for the client
    /// (usage, stop reasons, thinking) produce no chunks.
    pub fn encode(&mut self, event: StreamEvent) -> Vec<UiStreamChunk> {
        if self.finished {
            return Vec::new();
        }

        match event {
            StreamEvent::TextDelta { text } if !text.is_empty() => {
                let mut chunks = Vec::with_capacity(2);
                let id = match &self.open_part {
                    Some(id) => id.clone(),
                    None => {
                        let id = self.next_part.to_string();
                        self.next_part += 1;
                        self.open_part = Some(id.clone());
                        chunks.push(UiStreamChunk::TextStart { id: id.clone() });
                        id
                    }
                };
                chunks.push(UiStreamChunk::TextDelta { id, delta: text });
                chunks
            }
            StreamEvent::Done => self.finish(),
            _ => Vec::new(),
        }
    }

    /// Close the reply with the completion marker. Idempotent.
    pub fn finish(&mut self) -> Vec<UiStreamChunk> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let mut chunks = Vec::with_capacity(3);
        if let Some(id) = self.open_part.take() {
            chunks.push(UiStreamChunk::TextEnd { id });
        }
        chunks.push(UiStreamChunk::FinishStep);
        chunks.push(UiStreamChunk::Finish);
        chunks
    }

    /// Close the reply with the generic error chunk. Idempotent.
    pub fn fail(&mut self) -> Vec<UiStreamChunk> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;
        self.open_part = None;
        vec![UiStreamChunk::Error {
            error_text: GENERIC_ERROR_MESSAGE.to_string(),
        }]
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Re-encode a provider stream as UI chunks.
///
/// `first` is the event the caller already pulled to confirm the provider
/// accepted the request; `rest` is the remainder of the same stream. Reading
/// stops at `deadline`.
pub fn relay_ui_stream(
    first: StreamEvent,
    mut rest: LlmStream,
    deadline: Instant,
    message_id: String,
) -> UiChunkStream {
    Box::pin(async_stream::stream! {
        let mut encoder = UiStreamEncoder::new(message_id);
        for chunk in encoder.start() {
            yield chunk;
        }
        for chunk in encoder.encode(first) {
            yield chunk;
        }

        while !encoder.is_finished() {
            match tokio::time::timeout_at(deadline, rest.next()).await {
                Ok(Some(Ok(event))) => {
                    match &event {
                        StreamEvent::MessageDelta { stop_reason } => {
                            tracing::debug!(%stop_reason, "provider finished generating");
                        }
                        StreamEvent::Usage(usage) => {
                            tracing::debug!(
                                input_tokens = usage.input_tokens,
                                output_tokens = usage.output_tokens,
                                "provider usage"
                            );
                        }
                        _ => {}
                    }
                    for chunk in encoder.encode(event) {
                        yield chunk;
                    }
                }
                Ok(Some(Err(e))) => {
                    tracing::error!(error = %e, "provider stream failed mid-response");
                    for chunk in encoder.fail() {
                        yield chunk;
                    }
                }
                Ok(None) => {
                    for chunk in encoder.finish() {
                        yield chunk;
                    }
                }
                Err(_) => {
                    tracing::warn!("relay call exceeded its duration bound, closing stream");
                    break;
                }
            }
        }
    })
}
