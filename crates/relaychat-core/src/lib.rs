//! Relay logic and trait definitions for relaychat.
//!
//! This crate defines the "ports" (provider, credential, and transport traits)
//! that the infrastructure layer implements, plus the pure logic on both sides
//! of the wire: turning conversation turns into a provider request, encoding
//! provider events as UI stream chunks, and the chat surface state machine.
//! It depends only on `relaychat-types` -- never on `relaychat-infra` or any
//! HTTP crate.

pub mod chat;
pub mod credential;
pub mod llm;
pub mod relay;
