//! Resume API handlers: registration, owner queries, and pair selection.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rank_core::{EngineError, PairSelector};
use resume_arena::models::Resume;
use resume_arena::store::SqliteStore;
use serde::{Deserialize, Serialize};

use crate::api::{error_response, identity, unauthorized};
use crate::AppState;

/// Request body for registering an uploaded resume.
///
/// File intake itself is external; by the time this endpoint is called the
/// upload collaborator has already stored the file under `file_name`.
#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    /// Stored file name (unique).
    pub file_name: String,
    /// File name at upload time.
    pub original_name: String,
}

/// Register an uploaded resume's metadata.
///
/// # Endpoint
///
/// `POST /api/resumes`
///
/// # Response
///
/// - `201 Created`: JSON resume object with the initial rating
/// - `401 Unauthorized`: no caller identity
/// - `500 Internal Server Error`: database error
pub async fn create_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateResumeRequest>,
) -> Response {
    let Some(owner) = identity(&headers) else {
        return unauthorized();
    };

    let store = SqliteStore::new(state.db.clone());
    match store.create(
        Some(&owner),
        &req.file_name,
        &req.original_name,
        state.config.rating.initial_rating,
    ) {
        Ok(resume) => (StatusCode::CREATED, Json(resume)).into_response(),
        Err(e) => error_response(e),
    }
}

/// List the acting user's resumes, newest first.
///
/// # Endpoint
///
/// `GET /api/resumes/mine`
pub async fn list_mine(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(owner) = identity(&headers) else {
        return unauthorized();
    };

    let store = SqliteStore::new(state.db.clone());
    match store.list_by_owner(&owner) {
        Ok(resumes) => Json(resumes).into_response(),
        Err(e) => error_response(e),
    }
}

/// Query parameters for the single random draw.
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    /// Id to remove from the pool, used when refreshing one side of a pair.
    pub exclude_id: Option<String>,
}

/// Draw one resume from the weighted pool.
///
/// # Endpoint
///
/// `GET /api/resumes/random?exclude_id=`
///
/// # Response
///
/// - `200 OK`: JSON resume object
/// - `400 Bad Request`: pool is empty
/// - `500 Internal Server Error`: database error
pub async fn random_resume(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Response {
    let store = SqliteStore::new(state.db.clone());
    let selector = PairSelector::new(state.config.rating.clone());

    match selector.select_one(&store, &mut rand::thread_rng(), query.exclude_id.as_deref()) {
        Ok(resume) => Json(resume).into_response(),
        Err(e) => error_response(e),
    }
}

/// Response body for the pair endpoint.
#[derive(Debug, Serialize)]
pub struct PairResponse {
    /// The two distinct resumes to compare.
    pub pair: [Resume; 2],
}

/// Draw two distinct resumes for a head-to-head vote.
///
/// # Endpoint
///
/// `GET /api/resumes/pair?exclude_id=`
///
/// # Response
///
/// - `200 OK`: `{"pair": [a, b]}`
/// - `400 Bad Request`: fewer than two eligible resumes
/// - `500 Internal Server Error`: database error
pub async fn get_pair(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Response {
    let store = SqliteStore::new(state.db.clone());
    let selector = PairSelector::new(state.config.rating.clone());

    match selector.select_pair(&store, &mut rand::thread_rng(), query.exclude_id.as_deref()) {
        Ok((first, second)) => Json(PairResponse {
            pair: [first, second],
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Get a resume profile by id, including its rating history.
///
/// # Endpoint
///
/// `GET /api/resumes/:id`
///
/// # Response
///
/// - `200 OK`: JSON resume profile with ascending rating history
/// - `404 Not Found`: no resume with that id
/// - `500 Internal Server Error`: database error
pub async fn get_resume(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = SqliteStore::new(state.db.clone());
    match store.profile(&id) {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => error_response(EngineError::ItemNotFound(id)),
        Err(e) => error_response(e),
    }
}
