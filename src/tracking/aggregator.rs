//! 指标聚合
//!
//! 每个聚合周期使用实测的墙钟间隔推进窗口与屏幕时间，而不是假设固定步长：
//! 定时器漂移、节流或后台暂停时窗口长度与累计时间仍然正确。

use std::time::Duration;

use super::session::Session;

/// Result of a window rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClosed {
    pub bpm: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricsAggregator {
    window: Duration,
}

impl MetricsAggregator {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Advance the session by `elapsed`.
    ///
    /// At most one rollover happens per call; a gap spanning several windows
    /// still reports the blinks accumulated so far exactly once.
    pub fn tick(&self, session: &mut Session, elapsed: Duration) -> Option<WindowClosed> {
        let secs = elapsed.as_secs_f64();

        if session.gaze.is_on_screen() {
            session.session_screen_time += secs;
            session.total_screen_time += secs;
        }

        session.window_remaining = (session.window_remaining - secs).max(0.0);
        if session.window_remaining > 0.0 {
            return None;
        }

        session.last_reported_bpm = session.blink_count_in_window;
        session.blink_count_in_window = 0;
        session.window_remaining = self.window.as_secs_f64();
        session.windows_closed += 1;

        Some(WindowClosed {
            bpm: session.last_reported_bpm,
        })
    }
}
