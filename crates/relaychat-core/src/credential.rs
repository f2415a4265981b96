//! Credential source trait for the provider API key.

/// Source of the provider API key.
///
/// Resolved on every relay call rather than once at startup, so a key that
/// appears or disappears while the server runs takes effect immediately.
/// Implementations live in relaychat-infra (e.g., `EnvCredentialSource`).
pub trait CredentialSource: Send + Sync {
    /// The API key, or `None` when no key is configured.
    fn api_key(&self) -> Option<String>;

    /// Human-readable description of where keys are looked up, used in the
    /// error body when none is found.
    fn describe(&self) -> String;
}
