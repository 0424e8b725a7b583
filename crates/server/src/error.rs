//! Engine-to-HTTP error translation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use infraforge_engine::EngineError;
use serde_json::json;

/// An error ready to leave the API boundary.
///
/// Serialized as `{"error": "<message>"}` with a status reflecting who is at
/// fault: 404 for names that resolve to nothing, 400 for requests the engine
/// refused to act on, 500 for failures past our side of the wire.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::UnknownChain(_) | EngineError::ContractNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EngineError::ValidationError(_) | EngineError::CompileError(_) => {
                StatusCode::BAD_REQUEST
            }
            EngineError::ConnectionError { .. } | EngineError::BroadcastError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_statuses() {
        let cases = [
            (EngineError::UnknownChain("dogecoin".into()), StatusCode::NOT_FOUND),
            (EngineError::ContractNotFound("Token".into()), StatusCode::NOT_FOUND),
            (EngineError::ValidationError("missing key".into()), StatusCode::BAD_REQUEST),
            (EngineError::CompileError("ParserError".into()), StatusCode::BAD_REQUEST),
            (
                EngineError::ConnectionError {
                    chain: "Ethereum".into(),
                    reason: "connection refused".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                EngineError::BroadcastError("nonce too low".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn error_body_is_a_json_object() {
        let response = ApiError::from(EngineError::UnknownChain("dogecoin".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Unsupported chain: dogecoin");
    }
}
