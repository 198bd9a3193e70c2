use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::extractors::{JsonBody, UserId};
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::tracking::LandmarkFrame;
use crate::validation::validate_frame;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/frames", post(push_frame))
        .route("/snapshot", get(snapshot))
}

async fn start(
    user: UserId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.tracking().start(user.as_str()).await?;
    Ok(created(snapshot))
}

async fn stop(
    user: UserId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.tracking().stop(user.as_str()).await?;
    Ok(ok(snapshot))
}

async fn push_frame(
    user: UserId,
    State(state): State<AppState>,
    JsonBody(frame): JsonBody<LandmarkFrame>,
) -> Result<impl IntoResponse, AppError> {
    validate_frame(&frame).map_err(|msg| AppError::bad_request("INVALID_FRAME", msg))?;
    state.tracking().push_frame(user.as_str(), frame).await?;
    Ok(ok(serde_json::json!({ "accepted": true })))
}

async fn snapshot(
    user: UserId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.tracking().snapshot(user.as_str()).await?;
    Ok(ok(snapshot))
}
