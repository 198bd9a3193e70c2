use serde::Serialize;

use crate::store::operations::break_alerts::BreakAlertRecord;
use crate::tracking::MetricsSnapshot;

/// Fan-out of per-user updates to realtime subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
    Snapshot {
        user_id: String,
        snapshot: MetricsSnapshot,
    },
    BreakAlert {
        user_id: String,
        alert: BreakAlertRecord,
    },
}

impl TrackingEvent {
    pub fn user_id(&self) -> &str {
        match self {
            Self::Snapshot { user_id, .. } | Self::BreakAlert { user_id, .. } => user_id,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Snapshot { .. } => "snapshot",
            Self::BreakAlert { .. } => "break_alert",
        }
    }
}
