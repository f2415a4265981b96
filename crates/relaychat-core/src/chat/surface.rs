//! Chat surface: in-memory conversation state driven by relay calls.
//!
//! Status transitions follow the relay call lifecycle:
//!
//! ```text
//! Ready ---submit---> Submitted ---first chunk---> Streaming ---finish---> Ready
//!                         |                            |
//!                         +----------failure-----------+----> Error
//! Error ---submit---> Submitted
//! ```
//!
//! Every change is published as a [`SurfaceSnapshot`] on a `watch` channel, so
//! renderers subscribe instead of polling.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use uuid::Uuid;

use relaychat_types::chat::{ChatStatus, MessagePart, MessageRole, UiMessage, UiStreamChunk};
use relaychat_types::error::ChatError;

use super::transport::ChatTransport;

/// The one notice shown for every kind of failure.
pub const ERROR_NOTICE: &str = "Something went wrong. Please try again.";

/// Fixed text sent by the quick-reply shortcut.
pub const QUICK_REPLY_TEXT: &str = "\u{1F44D}";

/// Everything a renderer needs to draw the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSnapshot {
    pub messages: Vec<UiMessage>,
    pub status: ChatStatus,
    pub error: Option<String>,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply streamed to completion.
    Completed,
    /// The relay call failed; the surface is in the error status.
    Failed,
    /// Nothing happened: empty input, or a call is already outstanding.
    Rejected,
}

/// Client-side chat view state.
///
/// Cheap to clone; clones share the same conversation. Only one relay call
/// may be outstanding at a time: a submission made while the status is
/// `Submitted` or `Streaming` is rejected without touching the history.
#[derive(Clone)]
pub struct ChatSurface {
    transport: Arc<dyn ChatTransport>,
    state: Arc<watch::Sender<SurfaceSnapshot>>,
}

impl ChatSurface {
    pub fn new<T: ChatTransport + 'static>(transport: T) -> Self {
        let (state, _) = watch::channel(SurfaceSnapshot::default());
        Self {
            transport: Arc::new(transport),
            state: Arc::new(state),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SurfaceSnapshot> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> ChatStatus {
        self.state.borrow().status
    }

    /// Submit the fixed quick-reply text.
    pub async fn submit_quick_reply(&self) -> SubmitOutcome {
        self.submit(QUICK_REPLY_TEXT).await
    }

    /// Submit a new user turn and drive the relay call to completion.
    ///
    /// Appends exactly one user turn before calling the relay; never re-sends
    /// an unchanged history.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Rejected;
        }

        let turn = UiMessage::user_text(Uuid::now_v7().to_string(), text);
        let mut outgoing = None;
        self.state.send_if_modified(|s| {
            if !s.status.accepts_input() {
                return false;
            }
            s.messages.push(turn);
            s.status = ChatStatus::Submitted;
            s.error = None;
            outgoing = Some(s.messages.clone());
            true
        });

        let Some(history) = outgoing else {
            tracing::debug!(status = %self.status(), "submission rejected while a call is outstanding");
            return SubmitOutcome::Rejected;
        };

        let guard = CallGuard {
            state: &self.state,
            settled: false,
        };
        let result = self.run_call(history).await;
        guard.settle(result)
    }

    async fn run_call(&self, history: Vec<UiMessage>) -> Result<(), ChatError> {
        let mut stream = self.transport.send_messages(history);
        let mut reply = ReplyAssembler::default();
        let mut finished = false;

        while let Some(item) = stream.next().await {
            let chunk = item?;

            self.state.send_if_modified(|s| {
                if s.status == ChatStatus::Submitted {
                    s.status = ChatStatus::Streaming;
                    true
                } else {
                    false
                }
            });

            match chunk {
                UiStreamChunk::Start { message_id } => reply.message_id = message_id,
                UiStreamChunk::TextDelta { id, delta } => {
                    if !delta.is_empty() {
                        self.state
                            .send_modify(|s| reply.apply_delta(&mut s.messages, &id, &delta));
                    }
                }
                UiStreamChunk::Finish => finished = true,
                UiStreamChunk::Error { error_text } => return Err(ChatError::Remote(error_text)),
                UiStreamChunk::StartStep
                | UiStreamChunk::TextStart { .. }
                | UiStreamChunk::TextEnd { .. }
                | UiStreamChunk::FinishStep
                | UiStreamChunk::Unknown => {}
            }
        }

        if finished {
            Ok(())
        } else {
            Err(ChatError::Incomplete)
        }
    }
}

/// Moves the surface out of `Submitted`/`Streaming` once a call ends.
///
/// If the `submit` future is dropped mid-call, the drop marks the call
/// failed so the surface accepts input again.
struct CallGuard<'a> {
    state: &'a watch::Sender<SurfaceSnapshot>,
    settled: bool,
}

impl CallGuard<'_> {
    fn settle(mut self, result: Result<(), ChatError>) -> SubmitOutcome {
        self.settled = true;
        match result {
            Ok(()) => {
                self.state.send_modify(|s| s.status = ChatStatus::Ready);
                SubmitOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "relay call failed");
                mark_failed(self.state);
                SubmitOutcome::Failed
            }
        }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("relay call abandoned before it finished");
            mark_failed(self.state);
        }
    }
}

fn mark_failed(state: &watch::Sender<SurfaceSnapshot>) {
    state.send_modify(|s| {
        s.status = ChatStatus::Error;
        s.error = Some(ERROR_NOTICE.to_string());
    });
}

/// Tracks where the in-progress assistant turn lives in the history.
#[derive(Default)]
struct ReplyAssembler {
    message_id: Option<String>,
    message_index: Option<usize>,
    parts: HashMap<String, usize>,
}

impl ReplyAssembler {
    /// Append a fragment, creating the assistant turn on the first one.
    fn apply_delta(&mut self, messages: &mut Vec<UiMessage>, part_id: &str, delta: &str) {
        let index = match self.message_index {
            Some(index) => index,
            None => {
                let id = self
                    .message_id
                    .clone()
                    .unwrap_or_else(|| Uuid::now_v7().to_string());
                messages.push(UiMessage {
                    id,
                    role: MessageRole::Assistant,
                    parts: Vec::new(),
                });
                let index = messages.len() - 1;
                self.message_index = Some(index);
                index
            }
        };

        let parts = &mut messages[index].parts;
        let part_index = *self.parts.entry(part_id.to_string()).or_insert_with(|| {
            parts.push(MessagePart::text(""));
            parts.len() - 1
        });

        if let MessagePart::Text { text } = &mut parts[part_index] {
            text.push_str(delta);
        }
    }
}
