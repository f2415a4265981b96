//! Terminal rendition of the chat surface.
//!
//! Reads lines with `rustyline-async`, submits them through a
//! [`ChatSurface`](relaychat_core::chat::surface::ChatSurface) backed by the
//! HTTP transport, and renders the surface's snapshots as they change.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
