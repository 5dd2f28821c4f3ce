//! Vote API handler.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rank_core::MatchResolver;
use resume_arena::store::SqliteStore;
use serde::{Deserialize, Serialize};

use crate::api::error_response;
use crate::AppState;

/// Request body for recording a vote.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Resume the voter preferred.
    pub winner_id: String,
    /// Resume the voter rejected.
    pub loser_id: String,
}

/// Response body after a recorded vote.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    /// Confirmation message.
    pub message: String,
    /// Winner's rating after the update.
    pub winner_rating: i32,
    /// Loser's rating after the update.
    pub loser_rating: i32,
}

/// Record the outcome of a head-to-head comparison.
///
/// Both ratings are updated atomically as a unit; concurrent votes on the
/// same resumes are retried inside the resolver.
///
/// # Endpoint
///
/// `POST /api/resumes/vote`
///
/// # Response
///
/// - `200 OK`: both new ratings
/// - `400 Bad Request`: winner and loser are the same resume
/// - `404 Not Found`: either resume doesn't exist (nothing was changed)
/// - `500 Internal Server Error`: database error or exhausted commit retries
pub async fn record_vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Response {
    let store = SqliteStore::new(state.db.clone());
    let resolver = MatchResolver::new(state.config.rating.clone());

    match resolver.record_vote(&store, &req.winner_id, &req.loser_id) {
        Ok(outcome) => Json(VoteResponse {
            message: "Vote recorded".to_string(),
            winner_rating: outcome.winner_rating,
            loser_rating: outcome.loser_rating,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
