//! Google Gemini provider (Generative Language API, `streamGenerateContent`).

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiProvider;
