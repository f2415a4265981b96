//! Relay error type mapping to HTTP status codes and `{"error": ...}` bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use relaychat_core::relay::GENERIC_ERROR_MESSAGE;
use relaychat_types::llm::LlmError;

/// Body text for a request whose `messages` is not a valid turn array.
pub const INVALID_MESSAGES_MESSAGE: &str = "Messages must be an array";

/// Errors the relay endpoint answers before any stream starts.
#[derive(Debug)]
pub enum RelayError {
    /// No API key could be resolved. Carries where keys are looked up.
    MissingCredential(String),
    /// The body has no valid `messages` array.
    InvalidMessages,
    /// The provider call failed before its first event.
    Upstream(LlmError),
}

impl From<LlmError> for RelayError {
    fn from(e: LlmError) -> Self {
        RelayError::Upstream(e)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::MissingCredential(names) => {
                tracing::error!(keys = %names, "no provider API key configured");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{names} is not set"))
            }
            RelayError::InvalidMessages => {
                (StatusCode::BAD_REQUEST, INVALID_MESSAGES_MESSAGE.to_string())
            }
            RelayError::Upstream(e) => {
                // Provider detail stays in the log.
                tracing::error!(error = %e, "relay call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_response() {
        let response =
            RelayError::MissingCredential("GOOGLE_GENERATIVE_AI_API_KEY or GEMINI_API_KEY".into())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "GOOGLE_GENERATIVE_AI_API_KEY or GEMINI_API_KEY is not set"})
        );
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_exposed() {
        for err in [
            LlmError::RateLimited,
            LlmError::AuthenticationFailed,
            LlmError::Http {
                status: 503,
                message: "backend unavailable: shard 7".to_string(),
            },
            LlmError::Timeout(30),
        ] {
            let response = RelayError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({"error": "An error occurred while processing your request"})
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_messages_response() {
        let response = RelayError::InvalidMessages.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Messages must be an array"})
        );
    }
}
