use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use stealth_crypto::CryptoError;
use thiserror::Error;

/// Maps onto the three node-side status classes from §6: `400` invalid R,
/// `401` bad auth, `500` internal.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("bad request: {0}")]
    BadRequest(#[from] CryptoError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            NodeError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            NodeError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            NodeError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}
