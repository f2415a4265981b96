//! LLM provider abstractions for relaychat.
//!
//! - `LlmProvider`: trait for concrete provider implementations
//! - `BoxLlmProvider`: cloneable type-erased wrapper held by the relay

pub mod box_provider;
pub mod provider;
