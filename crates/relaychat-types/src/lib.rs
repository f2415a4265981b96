//! Shared domain types for relaychat.
//!
//! This crate contains the types used across the relay and the chat surface:
//! provider requests and stream events, conversation turns, the UI stream
//! chunk protocol, request status, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
