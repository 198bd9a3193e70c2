mod common;

use axum::http::{header, Method, StatusCode};

use common::app::spawn_with;
use common::http::{request, response_json};
use eyedentify::config::{LimitsConfig, TrackingConfig};

#[tokio::test]
async fn it_sse_stream_opens_for_user() {
    let app = spawn_with(TrackingConfig::default(), LimitsConfig::default()).await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/realtime/events",
        None,
        &[("x-user-id", "alice".to_string())],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
    drop(resp);
}

#[tokio::test]
async fn it_sse_connection_limit_is_enforced() {
    let app = spawn_with(
        TrackingConfig::default(),
        LimitsConfig {
            max_active_sessions: 4,
            max_sse_connections: 0,
        },
    )
    .await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/realtime/events",
        None,
        &[("x-user-id", "alice".to_string())],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "TOO_MANY_SSE_CONNECTIONS");
    assert_eq!(app.state.active_sse_connections(), 0);
}

#[tokio::test]
async fn it_sse_requires_user() {
    let app = spawn_with(TrackingConfig::default(), LimitsConfig::default()).await;

    let resp = request(&app.app, Method::GET, "/api/realtime/events", None, &[]).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
