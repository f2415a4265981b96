//! Application state shared by the relay handlers.
//!
//! AppState holds no per-conversation data: the client re-sends the full
//! history on every call. It only carries where the API key comes from, how
//! to build a provider for a key, and the per-call duration bound.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use relaychat_core::credential::CredentialSource;
use relaychat_core::llm::box_provider::BoxLlmProvider;
use relaychat_infra::llm::create_provider;
use relaychat_infra::secret::EnvCredentialSource;
use relaychat_types::config::ServerConfig;

/// Builds the provider for one relay call from the resolved API key.
pub type ProviderFactory = Arc<dyn Fn(SecretString) -> BoxLlmProvider + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialSource>,
    pub provider_factory: ProviderFactory,
    pub max_duration: Duration,
}

impl AppState {
    /// Production wiring: environment credentials and the Gemini provider.
    pub fn init(config: &ServerConfig) -> Self {
        Self {
            credentials: Arc::new(EnvCredentialSource::new()),
            provider_factory: Arc::new(create_provider),
            max_duration: Duration::from_secs(config.max_duration_secs),
        }
    }
}
