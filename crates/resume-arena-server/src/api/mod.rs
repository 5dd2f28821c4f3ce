//! API handlers for the resume arena server.

pub mod leaderboard;
pub mod resumes;
pub mod vote;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rank_core::EngineError;
use serde::Serialize;

/// JSON error body shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub message: String,
}

/// Map an engine failure to its HTTP representation.
///
/// `NotEnoughItems` and `SelfMatch` are caller-visible 400s, missing vote
/// targets are 404, anything storage-shaped is a 500 with a generic body.
/// `Conflict` is retried inside the resolver and should not reach this
/// point; mapping it anyway keeps the conversion total.
pub fn error_response(err: EngineError) -> Response {
    let status = match err {
        EngineError::NotEnoughItems | EngineError::SelfMatch => StatusCode::BAD_REQUEST,
        EngineError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict | EngineError::StorageUnavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {err}");
        "Server error".to_string()
    } else {
        err.to_string()
    };

    (status, Json(ErrorBody { message })).into_response()
}

/// Resolve the pre-authenticated caller identity.
///
/// Authentication itself is external: a fronting proxy verifies the session
/// and stamps the `x-user-id` header. The engine trusts that identity.
pub fn identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// 401 response for endpoints that require an identity.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            message: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}
