//! BoxLlmProvider -- cloneable dynamic dispatch wrapper for LlmProvider.

use std::sync::Arc;

use relaychat_types::llm::CompletionRequest;

use super::provider::{LlmProvider, LlmStream};

/// Type-erased LLM provider.
///
/// Wraps any `LlmProvider` implementation behind an `Arc`, so the relay can
/// hand the same provider to a spawned stream without caring which backend
/// it is.
#[derive(Clone)]
pub struct BoxLlmProvider {
    inner: Arc<dyn LlmProvider>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Model identifier requests are sent to.
    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Send a streaming completion request. Returns a stream of events.
    pub fn stream(&self, request: CompletionRequest) -> LlmStream {
        self.inner.stream(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use relaychat_types::llm::{LlmError, StreamEvent};

    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        fn stream(&self, request: CompletionRequest) -> LlmStream {
            let text = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Box::pin(futures_util::stream::iter(vec![
                Ok::<_, LlmError>(StreamEvent::TextDelta { text }),
                Ok(StreamEvent::Done),
            ]))
        }
    }

    #[tokio::test]
    async fn test_box_provider_delegates() {
        let provider = BoxLlmProvider::new(EchoProvider);
        let cloned = provider.clone();
        assert_eq!(cloned.name(), "echo");
        assert_eq!(cloned.model(), "echo-1");

        let request = CompletionRequest {
            model: "echo-1".to_string(),
            messages: vec![relaychat_types::llm::Message {
                role: relaychat_types::llm::MessageRole::User,
                content: "ping".to_string(),
            }],
            system: None,
            max_tokens: None,
            temperature: None,
        };
        let events: Vec<_> = cloned.stream(request).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            Ok(StreamEvent::TextDelta { text }) if text == "ping"
        ));
    }
}
