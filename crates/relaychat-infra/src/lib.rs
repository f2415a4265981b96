//! Infrastructure implementations for relaychat.
//!
//! Concrete adapters for the ports defined in `relaychat-core`: the Gemini
//! streaming provider, the environment credential source, the HTTP chat
//! transport used by the terminal surface, and the config file loader.

pub mod config;
pub mod llm;
pub mod secret;
pub mod transport;
