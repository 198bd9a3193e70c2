use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::services::events::TrackingEvent;
use crate::store::operations::alert_preferences::AlertPreference;
use crate::store::operations::break_alerts::BreakAlertRecord;
use crate::store::Store;
use crate::tracking::{AlertChannel, BreakAlert};

/// Records break alerts and pushes them to the user's realtime stream.
///
/// The client decides how to present the alert from the `mode` stored in
/// the user's preference; this channel never renders anything itself.
pub struct StoreAlertChannel {
    store: Arc<Store>,
    events: broadcast::Sender<TrackingEvent>,
}

impl StoreAlertChannel {
    pub fn new(store: Arc<Store>, events: broadcast::Sender<TrackingEvent>) -> Self {
        Self { store, events }
    }

    fn preference(&self, user_id: &str) -> AlertPreference {
        match self.store.get_alert_preference(user_id) {
            Ok(pref) => pref,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to read alert preference, using default");
                AlertPreference::default_for(user_id)
            }
        }
    }
}

impl AlertChannel for StoreAlertChannel {
    fn raise_break_alert(&self, user_id: &str, alert: &BreakAlert) {
        let preference = self.preference(user_id);
        if !preference.enabled {
            tracing::info!(user_id, bpm = alert.bpm, "Break alert suppressed by preference");
            return;
        }

        let record = BreakAlertRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            bpm: alert.bpm,
            message: alert.message.clone(),
            mode: preference.mode,
            acknowledged: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.insert_break_alert(&record) {
            tracing::warn!(error = %e, user_id, "Failed to persist break alert");
        }

        tracing::info!(
            user_id,
            bpm = alert.bpm,
            mode = ?record.mode,
            "Break alert raised"
        );

        let _ = self.events.send(TrackingEvent::BreakAlert {
            user_id: user_id.to_string(),
            alert: record,
        });
    }
}
