use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::extractors::UserId;
use crate::response::AppError;
use crate::services::events::TrackingEvent;
use crate::state::AppState;

/// 连接结束时归还计数
struct SseGuard(Arc<AtomicUsize>);

impl Drop for SseGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(sse_handler))
}

pub async fn sse_handler(
    user: UserId,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let max_sse = state.config().limits.max_sse_connections;
    let counter = state.sse_connections().clone();
    let current = counter.fetch_add(1, Ordering::SeqCst);
    let guard = SseGuard(counter);
    if current >= max_sse {
        return Err(AppError::too_many_requests(
            "TOO_MANY_SSE_CONNECTIONS",
            "Too many SSE connections",
        ));
    }

    let mut events_rx = state.tracking().subscribe();
    let mut shutdown_rx = state.shutdown_rx();
    let user_id = user.0;

    let stream = async_stream::stream! {
        let _guard = guard;
        loop {
            tokio::select! {
                received = events_rx.recv() => match received {
                    Ok(event) if event.user_id() == user_id => {
                        if let Some(sse) = to_sse_event(&event) {
                            yield Ok(sse);
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(user_id = %user_id, skipped, "SSE subscriber lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = shutdown_rx.recv() => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

fn to_sse_event(event: &TrackingEvent) -> Option<Event> {
    let data = match event {
        TrackingEvent::Snapshot { snapshot, .. } => serde_json::to_string(snapshot),
        TrackingEvent::BreakAlert { alert, .. } => serde_json::to_string(alert),
    };
    match data {
        Ok(json) => Some(Event::default().event(event.event_name()).data(json)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize realtime event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{GazeState, MetricsSnapshot};

    #[test]
    fn snapshot_event_is_named() {
        let event = TrackingEvent::Snapshot {
            user_id: "u1".to_string(),
            snapshot: MetricsSnapshot {
                bpm: 12,
                blinks_in_window: 3,
                window_remaining_seconds: 40.0,
                session_screen_time: 20.0,
                total_screen_time: 80.0,
                gaze: GazeState::Center,
                windows_closed: 1,
            },
        };
        assert!(to_sse_event(&event).is_some());
        assert_eq!(event.event_name(), "snapshot");
    }

    #[test]
    fn guard_releases_slot() {
        let counter = Arc::new(AtomicUsize::new(1));
        drop(SseGuard(counter.clone()));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
