//! HTTP chat transport: posts the history to a relay endpoint and decodes
//! the UI message stream it answers with.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;

use relaychat_core::chat::transport::{ChatTransport, ChunkStream};
use relaychat_types::chat::{ChatRequest, DONE_SENTINEL, UiMessage, UiStreamChunk};
use relaychat_types::error::ChatError;

/// Talks to `POST {base_url}/api/chat`.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpChatTransport {
    fn send_messages(&self, messages: Vec<UiMessage>) -> ChunkStream {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        Box::pin(async_stream::try_stream! {
            let response = client
                .post(&endpoint)
                .json(&ChatRequest { messages })
                .send()
                .await
                .map_err(|e| ChatError::Transport(e.to_string()))?;

            let response = check_status(response).await?;
            let mut events = response.bytes_stream().eventsource();

            while let Some(event) = events.next().await {
                let event = event.map_err(|e| ChatError::Transport(e.to_string()))?;
                if event.data == DONE_SENTINEL {
                    break;
                }

                let chunk: UiStreamChunk = serde_json::from_str(&event.data)
                    .map_err(|e| ChatError::Decode(format!("{e}: {}", event.data)))?;
                yield chunk;
            }
        })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ChatError::Http {
        status: status.as_u16(),
        body,
    })
}
