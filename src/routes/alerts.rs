use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::constants::{DEFAULT_ALERT_PAGE_SIZE, MAX_ALERT_PAGE_SIZE};
use crate::extractors::UserId;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::clamp_page_size;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/:id/ack", post(acknowledge))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertQuery {
    limit: Option<usize>,
    #[serde(default)]
    unread_only: bool,
}

async fn list_alerts(
    user: UserId,
    State(state): State<AppState>,
    Query(q): Query<AlertQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_page_size(q.limit, DEFAULT_ALERT_PAGE_SIZE, MAX_ALERT_PAGE_SIZE);
    let alerts = state
        .store()
        .list_break_alerts(user.as_str(), limit, q.unread_only)?;
    Ok(ok(alerts))
}

async fn acknowledge(
    user: UserId,
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .store()
        .acknowledge_break_alert(user.as_str(), &alert_id)?;
    Ok(ok(record))
}
