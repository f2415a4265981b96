//! Credential source implementations.
//!
//! - `env`: resolves the provider API key from environment variables

pub mod env;

pub use env::EnvCredentialSource;
