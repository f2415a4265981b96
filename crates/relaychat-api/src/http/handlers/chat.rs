//! Relay endpoint.
//!
//! POST /api/chat
//!
//! Accepts `{ "messages": [...] }` (the full conversation so far), opens one
//! streaming provider call, and relays the reply as a UI message stream:
//! SSE `data:` lines each carrying one JSON chunk, terminated by `[DONE]`.
//!
//! Checks run in order and short-circuit:
//! 1. credential present, else 500
//! 2. `messages` is an array of turns, else 400
//! 3. provider produced its first event, else 500
//!
//! Only after all three does the response commit to a 200 stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use secrecy::SecretString;
use serde_json::Value;
use tokio::time::Instant;
use tokio_stream::Stream;
use uuid::Uuid;

use relaychat_core::relay::build_completion_request;
use relaychat_core::relay::ui_stream::{UiChunkStream, relay_ui_stream};
use relaychat_types::chat::{
    DONE_SENTINEL, UI_MESSAGE_STREAM_HEADER, UI_MESSAGE_STREAM_VERSION, UiMessage,
};
use relaychat_types::llm::LlmError;

use crate::http::error::RelayError;
use crate::state::AppState;

/// POST /api/chat -- relay one conversation to the provider as SSE.
pub async fn relay_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, RelayError> {
    // Resolved per request so a key change takes effect without a restart.
    let api_key = state
        .credentials
        .api_key()
        .ok_or_else(|| RelayError::MissingCredential(state.credentials.describe()))?;

    let turns = parse_messages(&body)?;

    let deadline = Instant::now() + state.max_duration;
    let request = build_completion_request(&turns);
    let provider = (state.provider_factory)(SecretString::from(api_key));

    tracing::info!(
        provider = provider.name(),
        model = %request.model,
        turns = turns.len(),
        "relaying chat"
    );

    let mut stream = provider.stream(request);
    let first = match tokio::time::timeout_at(deadline, stream.next()).await {
        Ok(Some(Ok(event))) => event,
        Ok(Some(Err(e))) => return Err(e.into()),
        Ok(None) => {
            let e = LlmError::Stream("provider closed the stream without a response".into());
            return Err(e.into());
        }
        Err(_) => return Err(LlmError::Timeout(state.max_duration.as_secs()).into()),
    };

    let message_id = Uuid::now_v7().to_string();
    let chunks = relay_ui_stream(first, stream, deadline, message_id);

    let sse = Sse::new(sse_events(chunks))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)));

    Ok(([(UI_MESSAGE_STREAM_HEADER, UI_MESSAGE_STREAM_VERSION)], sse).into_response())
}

/// Extract the turn list from a raw request body.
///
/// Anything other than a JSON object whose `messages` is an array of valid
/// turns is rejected. Extra top-level fields are ignored.
fn parse_messages(body: &[u8]) -> Result<Vec<UiMessage>, RelayError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "request body is not JSON");
        RelayError::InvalidMessages
    })?;

    let Value::Object(mut fields) = value else {
        return Err(RelayError::InvalidMessages);
    };

    match fields.remove("messages") {
        Some(messages @ Value::Array(_)) => serde_json::from_value(messages).map_err(|e| {
            tracing::debug!(error = %e, "messages array holds an invalid turn");
            RelayError::InvalidMessages
        }),
        _ => Err(RelayError::InvalidMessages),
    }
}

/// Serialize chunks as SSE `data:` events, then the `[DONE]` sentinel.
fn sse_events(mut chunks: UiChunkStream) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        while let Some(chunk) = chunks.next().await {
            match serde_json::to_string(&chunk) {
                Ok(data) => yield Ok::<_, Infallible>(Event::default().data(data)),
                Err(e) => tracing::error!(error = %e, "failed to encode stream chunk"),
            }
        }
        yield Ok(Event::default().data(DONE_SENTINEL));
    }
}
