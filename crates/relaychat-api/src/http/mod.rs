//! HTTP layer for relaychat.
//!
//! Axum router hosting the relay endpoint (`POST /api/chat`) and a health
//! check, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
