use thiserror::Error;

/// Errors the chat surface can hit while driving one relay call.
///
/// None of these are shown to the end user in detail; any of them moves the
/// surface into the error status with a single generic notice.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("relay returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed stream chunk: {0}")]
    Decode(String),

    #[error("relay reported an error: {0}")]
    Remote(String),

    #[error("stream ended without a completion marker")]
    Incomplete,
}
