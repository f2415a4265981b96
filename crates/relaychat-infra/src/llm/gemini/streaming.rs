//! SSE stream creation and chunk mapping for Gemini `streamGenerateContent`.
//!
//! With `alt=sse` the API answers with plain SSE: every `data:` payload is a
//! full `GenerateContentResponse` carrying the newly generated parts. There are
//! no named events and no terminating sentinel; the response body simply ends.
//!
//! Events are emitted in this order:
//! 1. `Connected` once the HTTP status is known to be successful
//! 2. `TextDelta` / `ThinkingDelta` per non-empty part
//! 3. `MessageDelta` when a candidate reports its finish reason
//! 4. `Usage` with the last reported usage, then `Done` when the body ends

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use relaychat_core::llm::provider::LlmStream;
use relaychat_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::types::{GeminiErrorEnvelope, GenerateContentResponse, GeminiRequest};

/// Open a streaming call and map its SSE chunks to [`StreamEvent`]s.
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: &SecretString,
) -> LlmStream {
    let client = client.clone();
    let url = url.to_string();
    let api_key = api_key.expose_secret().to_string();

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let response = check_status(response).await?;
        yield StreamEvent::Connected;

        let mut events = response.bytes_stream().eventsource();
        let mut last_usage = None;

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(format!("response body read: {e}")))?;
            if event.data.trim().is_empty() {
                continue;
            }

            let chunk: GenerateContentResponse = serde_json::from_str(&event.data)
                .map_err(|e| LlmError::Deserialization(format!("gemini chunk: {e}")))?;

            if let Some(usage) = &chunk.usage_metadata {
                last_usage = Some(Usage {
                    input_tokens: usage.prompt_token_count,
                    output_tokens: usage.candidates_token_count,
                });
            }

            for stream_event in map_response_chunk(chunk) {
                yield stream_event;
            }
        }

        if let Some(usage) = last_usage {
            yield StreamEvent::Usage(usage);
        }
        yield StreamEvent::Done;
    })
}

/// Turn a non-2xx response into an [`LlmError`], passing 2xx through.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %error_body, "Gemini stream API error response");
    Err(map_error_status(status.as_u16(), &error_body))
}

/// Map an HTTP error status and body to an [`LlmError`].
fn map_error_status(status: u16, body: &str) -> LlmError {
    match status {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        _ => {
            let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.to_string());
            LlmError::Http { status, message }
        }
    }
}

/// Map one response chunk to zero or more stream events.
fn map_response_chunk(chunk: GenerateContentResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
        tracing::warn!(block_reason = %reason, "Gemini blocked the prompt");
        events.push(StreamEvent::MessageDelta {
            stop_reason: StopReason::ContentFilter,
        });
    }

    // Only the first candidate is used; the request never asks for more.
    if let Some(candidate) = chunk.candidates.into_iter().next() {
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            let Some(text) = part.text.filter(|t| !t.is_empty()) else {
                continue;
            };
            events.push(if part.thought {
                StreamEvent::ThinkingDelta { thinking: text }
            } else {
                StreamEvent::TextDelta { text }
            });
        }

        if let Some(reason) = candidate.finish_reason {
            events.push(StreamEvent::MessageDelta {
                stop_reason: map_finish_reason(&reason),
            });
        }
    }

    events
}

fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            StopReason::ContentFilter
        }
        _ => StopReason::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_parts_become_text_deltas() {
        let events = map_response_chunk(chunk(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#,
        ));
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta {
                    text: "Hel".to_string()
                },
                StreamEvent::TextDelta {
                    text: "lo".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_thought_parts_become_thinking_deltas() {
        let events = map_response_chunk(chunk(
            r#"{"candidates":[{"content":{"parts":[{"text":"pondering","thought":true}]}}]}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::ThinkingDelta {
                thinking: "pondering".to_string()
            }]
        );
    }

    #[test]
    fn test_finish_reason_maps_to_message_delta() {
        let events = map_response_chunk(chunk(
            r#"{"candidates":[{"content":{"parts":[{"text":""}]},"finishReason":"MAX_TOKENS"}]}"#,
        ));
        assert_eq!(
            events,
            vec![StreamEvent::MessageDelta {
                stop_reason: StopReason::MaxTokens
            }]
        );
        assert_eq!(map_finish_reason("SAFETY"), StopReason::ContentFilter);
        assert_eq!(map_finish_reason("STOP"), StopReason::EndTurn);
        assert_eq!(map_finish_reason("MALFORMED_FUNCTION_CALL"), StopReason::Other);
    }

    #[test]
    fn test_blocked_prompt_maps_to_content_filter() {
        let events = map_response_chunk(chunk(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#));
        assert_eq!(
            events,
            vec![StreamEvent::MessageDelta {
                stop_reason: StopReason::ContentFilter
            }]
        );
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            map_error_status(401, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(403, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(map_error_status(429, ""), LlmError::RateLimited));

        let err = map_error_status(
            400,
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(err.to_string(), "HTTP 400: API key not valid.");

        let err = map_error_status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
