use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;
use crate::openai::CompletionError;

/// Every way a generation request can fail, as seen by the caller.
///
/// The `Display` text is for server logs; the caller only ever gets
/// [`GenerationError::public_message`].
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("unparsable completion ({reason}): {raw}")]
    ResponseParse { reason: String, raw: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GenerationError::Configuration(_)
            | GenerationError::Upstream(_)
            | GenerationError::ResponseParse { .. }
            | GenerationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            GenerationError::InvalidInput(_) => "Missing script content.",
            GenerationError::Configuration(_) => "Missing OPENAI_API_KEY on the server.",
            GenerationError::Upstream(_) => "Failed to generate shorts from OpenAI.",
            GenerationError::ResponseParse { .. } => "Failed to parse AI response.",
            GenerationError::Internal(_) => "Unexpected server error.",
        }
    }
}

impl From<CompletionError> for GenerationError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingCredential => GenerationError::Configuration(err.to_string()),
            CompletionError::Http(_) | CompletionError::Status { .. } => GenerationError::Upstream(err.to_string()),
            CompletionError::Envelope(_) => GenerationError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        match &self {
            GenerationError::InvalidInput(_) => tracing::warn!("⚠️ {self}"),
            _ => tracing::error!("❌ {self}"),
        }
        let body = ErrorBody { error: self.public_message().to_string() };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: GenerationError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_input_is_a_client_error() {
        let (status, body) = render(GenerationError::InvalidInput("empty script".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Missing script content.");
    }

    #[tokio::test]
    async fn parse_errors_do_not_leak_raw_completion() {
        let err = GenerationError::ResponseParse { reason: "expected value".into(), raw: "secret upstream text".into() };
        assert!(err.to_string().contains("secret upstream text"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to parse AI response.");
    }

    #[test]
    fn completion_errors_map_onto_the_taxonomy() {
        assert!(matches!(GenerationError::from(CompletionError::MissingCredential), GenerationError::Configuration(_)));
        let status = CompletionError::Status { status: StatusCode::BAD_GATEWAY, body: "bad".into() };
        assert!(matches!(GenerationError::from(status), GenerationError::Upstream(_)));
        let envelope = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert!(matches!(GenerationError::from(CompletionError::Envelope(envelope)), GenerationError::Internal(_)));
    }
}
