pub mod alerts;
pub mod health;
pub mod preferences;
pub mod realtime;
pub mod tracking;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::Router;

use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

/// 单帧关键点 JSON 很小，64 KiB 足够
const MAX_BODY_SIZE: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/tracking", tracking::router())
        .nest("/realtime", realtime::router())
        .nest("/alerts", alerts::router())
        .nest("/preferences", preferences::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> impl IntoResponse {
    AppError::not_found("NOT_FOUND", "Not found")
}
