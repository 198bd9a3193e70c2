use serde::{Deserialize, Serialize};

pub const BREAK_ALERT_MESSAGE: &str =
    "Your blink rate has dropped. Look away from the screen and take a short break.";

/// How the user wants break alerts delivered. The core forwards this, the
/// client renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertMode {
    #[default]
    SystemNotification,
    InAppDialog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAlert {
    pub bpm: u32,
    pub message: String,
}

/// Outbound alert sink. Implementations must not block the tick.
pub trait AlertChannel: Send + Sync {
    fn raise_break_alert(&self, user_id: &str, alert: &BreakAlert);
}

#[derive(Debug, Clone, Copy)]
pub struct NotificationPolicy {
    bpm_threshold: u32,
}

impl NotificationPolicy {
    pub fn new(bpm_threshold: u32) -> Self {
        Self { bpm_threshold }
    }

    pub fn bpm_threshold(&self) -> u32 {
        self.bpm_threshold
    }

    /// Inclusive: a window closing exactly at the threshold alerts.
    pub fn on_window_closed(&self, bpm: u32) -> Option<BreakAlert> {
        (bpm <= self.bpm_threshold).then(|| BreakAlert {
            bpm,
            message: BREAK_ALERT_MESSAGE.to_string(),
        })
    }
}
