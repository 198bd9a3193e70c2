//! 眨眼检测模块
//!
//! 双眼 EAR 同时低于阈值即视为一次眨眼，并通过去抖间隔把连续多帧的
//! 闭眼合并成一次事件：慢速眨眼跨越多个采样周期时也只计一次。
//! 唯一的跨帧状态是 `Session::last_blink_at`。

use std::time::Duration;

use tokio::time::Instant;

use super::session::Session;
use super::types::BlinkEvent;

#[derive(Debug, Clone, Copy)]
pub struct BlinkDetector {
    threshold: f64,
    debounce: Duration,
}

impl BlinkDetector {
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            debounce,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// 评估一帧的双眼 EAR，满足条件时登记眨眼并计入当前窗口
    ///
    /// 距上次登记不足 `debounce` 的调用不会登记；间隔恰好等于 `debounce` 时登记。
    pub fn evaluate(
        &self,
        session: &mut Session,
        left_ear: f64,
        right_ear: f64,
        now: Instant,
    ) -> Option<BlinkEvent> {
        if !(left_ear < self.threshold && right_ear < self.threshold) {
            return None;
        }

        if let Some(last) = session.last_blink_at {
            if now.saturating_duration_since(last) < self.debounce {
                return None;
            }
        }

        session.last_blink_at = Some(now);
        session.blink_count_in_window = session.blink_count_in_window.saturating_add(1);
        Some(BlinkEvent { at: now })
    }
}
