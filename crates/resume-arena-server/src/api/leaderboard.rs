//! Leaderboard API handler.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rank_core::leaderboard;
use resume_arena::store::SqliteStore;
use serde::Deserialize;

use crate::api::error_response;
use crate::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

/// Query parameters for the leaderboard page.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Maximum number of results to return (default 50, capped at 200).
    pub limit: Option<usize>,
    /// Number of results to skip.
    pub offset: Option<usize>,
}

/// One page of the ranking: rating descending, ties broken by earliest
/// creation time.
///
/// # Endpoint
///
/// `GET /api/resumes/leaderboard?limit=&offset=`
///
/// # Response
///
/// - `200 OK`: JSON array of resume objects in rank order
/// - `500 Internal Server Error`: database error
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Response {
    let store = SqliteStore::new(state.db.clone());
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    match leaderboard::page(&store, limit, offset) {
        Ok(board) => Json(board).into_response(),
        Err(e) => error_response(e),
    }
}
