//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `relaychat-core`, and the factory the relay endpoint calls once per request
//! with the freshly resolved API key.
//!
//! [`LlmProvider`]: relaychat_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use relaychat_core::llm::box_provider::BoxLlmProvider;
use relaychat_core::relay::MODEL;

use self::gemini::GeminiProvider;

/// Create the relay's provider for one call.
pub fn create_provider(api_key: SecretString) -> BoxLlmProvider {
    BoxLlmProvider::new(GeminiProvider::new(api_key, MODEL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_uses_fixed_model() {
        let provider = create_provider(SecretString::from("test-key-not-real"));
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }
}
