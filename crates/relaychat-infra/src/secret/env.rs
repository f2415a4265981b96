//! Environment variable credential source.
//!
//! Key resolution, re-run on every call:
//! - `GOOGLE_GENERATIVE_AI_API_KEY` if set and non-blank
//! - otherwise `GEMINI_API_KEY` if set and non-blank
//! - otherwise no key

use relaychat_core::credential::CredentialSource;

/// Primary environment variable for the Gemini API key.
pub const PRIMARY_KEY_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

/// Fallback environment variable for the Gemini API key.
pub const FALLBACK_KEY_VAR: &str = "GEMINI_API_KEY";

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the API key from the process environment.
pub struct EnvCredentialSource {
    lookup: Lookup,
}

impl EnvCredentialSource {
    pub fn new() -> Self {
        // Non-Unicode values are treated as absent, like missing ones.
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve keys through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentialSource {
    fn api_key(&self) -> Option<String> {
        [PRIMARY_KEY_VAR, FALLBACK_KEY_VAR]
            .into_iter()
            .filter_map(|var| (self.lookup)(var))
            .find(|value| !value.trim().is_empty())
    }

    fn describe(&self) -> String {
        format!("{PRIMARY_KEY_VAR} or {FALLBACK_KEY_VAR}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(vars: &[(&str, &str)]) -> EnvCredentialSource {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvCredentialSource::with_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_primary_key_wins() {
        let creds = source(&[(PRIMARY_KEY_VAR, "primary"), (FALLBACK_KEY_VAR, "fallback")]);
        assert_eq!(creds.api_key().as_deref(), Some("primary"));
    }

    #[test]
    fn test_fallback_key_used_when_primary_missing() {
        let creds = source(&[(FALLBACK_KEY_VAR, "fallback")]);
        assert_eq!(creds.api_key().as_deref(), Some("fallback"));
    }

    #[test]
    fn test_empty_primary_falls_through() {
        let creds = source(&[(PRIMARY_KEY_VAR, "  "), (FALLBACK_KEY_VAR, "fallback")]);
        assert_eq!(creds.api_key().as_deref(), Some("fallback"));
    }

    #[test]
    fn test_no_key() {
        assert!(source(&[]).api_key().is_none());
        assert!(source(&[(PRIMARY_KEY_VAR, ""), (FALLBACK_KEY_VAR, "")])
            .api_key()
            .is_none());
    }

    #[test]
    fn test_describe_names_both_variables() {
        assert_eq!(
            source(&[]).describe(),
            "GOOGLE_GENERATIVE_AI_API_KEY or GEMINI_API_KEY"
        );
    }
}
