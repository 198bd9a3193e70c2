use std::time::Duration;

use tokio::time::Instant;

use super::types::{GazeState, MetricsSnapshot};

/// Mutable state of one active tracking session.
///
/// Both schedules (detection and aggregation) mutate this record; the
/// components themselves hold configuration only.
#[derive(Debug, Clone)]
pub struct Session {
    pub blink_count_in_window: u32,
    pub last_reported_bpm: u32,
    /// Seconds left in the current window, always within `[0, window_length]`.
    pub window_remaining: f64,
    pub session_screen_time: f64,
    pub total_screen_time: f64,
    pub last_blink_at: Option<Instant>,
    /// Sequence of the last sampled frame seen by detection; a repeat of the
    /// same sample never registers a second blink.
    pub last_frame_sequence: Option<u64>,
    pub gaze: GazeState,
    pub windows_closed: u64,
    pub started_at: Instant,
    pub last_aggregated_at: Instant,
    window_length: f64,
}

impl Session {
    /// `seed_total` is the persisted total loaded at start; the session
    /// counter always begins at zero.
    pub fn new(seed_total: f64, window: Duration, now: Instant) -> Self {
        let window_length = window.as_secs_f64();
        Self {
            blink_count_in_window: 0,
            last_reported_bpm: 0,
            window_remaining: window_length,
            session_screen_time: 0.0,
            total_screen_time: sanitize_total(seed_total),
            last_blink_at: None,
            last_frame_sequence: None,
            gaze: GazeState::Absent,
            windows_closed: 0,
            started_at: now,
            last_aggregated_at: now,
            window_length,
        }
    }

    pub fn window_length(&self) -> f64 {
        self.window_length
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bpm: self.last_reported_bpm,
            blinks_in_window: self.blink_count_in_window,
            window_remaining_seconds: self.window_remaining,
            session_screen_time: self.session_screen_time,
            total_screen_time: self.total_screen_time,
            gaze: self.gaze,
            windows_closed: self.windows_closed,
        }
    }
}

fn sanitize_total(total: f64) -> f64 {
    if total.is_finite() && total > 0.0 {
        total
    } else {
        0.0
    }
}
