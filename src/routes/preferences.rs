use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::extractors::{JsonBody, UserId};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::alert_preferences::AlertPreference;
use crate::tracking::AlertMode;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_preferences).put(update_preferences))
}

/// 部分更新：未提供的字段保持原值
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePreferences {
    mode: Option<AlertMode>,
    enabled: Option<bool>,
}

async fn get_preferences(
    user: UserId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let preference = state.store().get_alert_preference(user.as_str())?;
    Ok(ok(preference))
}

async fn update_preferences(
    user: UserId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdatePreferences>,
) -> Result<impl IntoResponse, AppError> {
    let current = state.store().get_alert_preference(user.as_str())?;
    let updated = AlertPreference {
        user_id: current.user_id,
        mode: req.mode.unwrap_or(current.mode),
        enabled: req.enabled.unwrap_or(current.enabled),
    };
    state.store().set_alert_preference(&updated)?;

    tracing::info!(user_id = %user.as_str(), mode = ?updated.mode, enabled = updated.enabled, "Alert preference updated");
    Ok(ok(updated))
}
