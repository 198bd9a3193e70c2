//! Aggregation tick: advance the window, accrue screen time, publish the
//! snapshot and hand low-BPM windows to the alert channel.

use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;

use crate::services::events::TrackingEvent;
use crate::tracking::{AggregationOutcome, AlertChannel, Pipeline, Session};

pub async fn run(
    user_id: &str,
    pipeline: &Pipeline,
    session: &Mutex<Session>,
    alerts: &dyn AlertChannel,
    events: &broadcast::Sender<TrackingEvent>,
) -> AggregationOutcome {
    let now = Instant::now();
    let outcome = {
        let mut session = session.lock().await;
        pipeline.on_aggregation_tick(&mut session, now)
    };

    if let Some(closed) = outcome.closed {
        tracing::info!(
            user_id,
            bpm = closed.bpm,
            session_screen_time = outcome.snapshot.session_screen_time,
            "Blink window closed"
        );
    }

    if let Some(alert) = &outcome.alert {
        alerts.raise_break_alert(user_id, alert);
    }

    // 没有订阅者时发送失败是正常情况
    let _ = events.send(TrackingEvent::Snapshot {
        user_id: user_id.to_string(),
        snapshot: outcome.snapshot.clone(),
    });

    outcome
}
