//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends streaming requests to the Generative Language API
//! (`/v1beta/models/{model}:streamGenerateContent?alt=sse`), authenticated with
//! the `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::SecretString;

use relaychat_core::llm::provider::{LlmProvider, LlmStream};
use relaychat_types::llm::{CompletionRequest, MessageRole};

use super::streaming::create_gemini_stream;
use super::types::{GeminiContent, GeminiRequest, GenerationConfig};

/// Google Gemini LLM provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Public Generative Language API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    ///
    /// Gemini calls the assistant role `model`. System messages that reach
    /// this point are folded into the system instruction.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let mut system = request.system.clone().unwrap_or_default();
        let mut contents = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            match message.role {
                MessageRole::User => {
                    contents.push(GeminiContent::text(Some("user"), message.content.clone()));
                }
                MessageRole::Assistant => {
                    contents.push(GeminiContent::text(Some("model"), message.content.clone()));
                }
                MessageRole::System => {
                    if !system.is_empty() {
                        system.push_str("\n\n");
                    }
                    system.push_str(&message.content);
                }
            }
        }

        GeminiRequest {
            system_instruction: (!system.is_empty()).then(|| GeminiContent::text(None, system)),
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

// GeminiProvider does NOT derive Debug; the key stays out of any formatted output.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn stream(&self, request: CompletionRequest) -> LlmStream {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let url = self.stream_url(model);
        let body = self.to_gemini_request(&request);

        tracing::debug!(model = %model, messages = body.contents.len(), "opening Gemini stream");
        create_gemini_stream(&self.client, &url, body, &self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use relaychat_types::llm::{LlmError, Message, StopReason, StreamEvent, Usage};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_provider() -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-flash".to_string(),
        )
    }

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages,
            system: Some("You are a helpful assistant.".to_string()),
            max_tokens: None,
            temperature: Some(0.7),
        }
    }

    fn message(role: MessageRole, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
        }
    }

    fn sse(chunks: &[&str]) -> String {
        chunks.iter().map(|c| format!("data: {c}\r\n\r\n")).collect()
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = make_provider();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_stream_url() {
        let provider = make_provider().with_base_url("http://localhost:8080/");
        assert_eq!(
            provider.stream_url("gemini-2.5-flash"),
            "http://localhost:8080/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
        assert!(make_provider()
            .stream_url("m")
            .starts_with("https://generativelanguage.googleapis.com/v1beta/models/m:"));
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let provider = make_provider();
        let gemini = provider.to_gemini_request(&request(vec![
            message(MessageRole::User, "Hi"),
            message(MessageRole::Assistant, "Hello!"),
            message(MessageRole::System, "Answer briefly."),
            message(MessageRole::User, "Bye"),
        ]));

        assert_eq!(gemini.contents.len(), 3);
        assert_eq!(gemini.contents[0].role.as_deref(), Some("user"));
        assert_eq!(gemini.contents[1].role.as_deref(), Some("model"));
        assert_eq!(gemini.contents[2].parts[0].text.as_deref(), Some("Bye"));
        assert_eq!(
            gemini.system_instruction.unwrap().parts[0].text.as_deref(),
            Some("You are a helpful assistant.\n\nAnswer briefly.")
        );
        assert_eq!(gemini.generation_config.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_stream_against_mock_server() {
        let server = MockServer::start().await;
        let body = sse(&[
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"}]}}],"usageMetadata":{"promptTokenCount":5,"candidatesTokenCount":1}}"#,
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"lo!"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":5,"candidatesTokenCount":2}}"#,
        ]);

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:streamGenerateContent"))
            .and(query_param("alt", "sse"))
            .and(header("x-goog-api-key", "test-key-not-real"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "You are a helpful assistant."}]},
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {"temperature": 0.7}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = make_provider().with_base_url(server.uri());
        let events: Vec<_> = provider
            .stream(request(vec![message(MessageRole::User, "hello")]))
            .collect()
            .await;
        let events: Vec<StreamEvent> = events.into_iter().map(Result::unwrap).collect();

        assert_eq!(
            events,
            vec![
                StreamEvent::Connected,
                StreamEvent::TextDelta {
                    text: "Hel".to_string()
                },
                StreamEvent::TextDelta {
                    text: "lo!".to_string()
                },
                StreamEvent::MessageDelta {
                    stop_reason: StopReason::EndTurn
                },
                StreamEvent::Usage(Usage {
                    input_tokens: 5,
                    output_tokens: 2
                }),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_quota_error_is_first_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(
                r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = make_provider().with_base_url(server.uri());
        let mut stream = provider.stream(request(vec![message(MessageRole::User, "hello")]));

        assert!(matches!(stream.next().await, Some(Err(LlmError::RateLimited))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_server_error_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = make_provider().with_base_url(server.uri());
        let mut stream = provider.stream(request(vec![message(MessageRole::User, "hello")]));

        match stream.next().await {
            Some(Err(LlmError::Http { status, message })) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal error encountered.");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse(&["not json"])),
            )
            .mount(&server)
            .await;

        let provider = make_provider().with_base_url(server.uri());
        let mut stream = provider.stream(request(vec![message(MessageRole::User, "hello")]));

        assert!(matches!(stream.next().await, Some(Ok(StreamEvent::Connected))));
        assert!(matches!(
            stream.next().await,
            Some(Err(LlmError::Deserialization(_)))
        ));
    }
}
