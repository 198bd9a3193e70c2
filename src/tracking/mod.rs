//! 屏幕用眼指标流水线
//!
//! 从每帧的眼部关键点推导出眨眼事件、视线方向、每分钟眨眼数与屏幕时间，
//! 并在眨眼频率过低时决定是否提醒休息。
//!
//! ## 模块
//! - `geometry`: EAR 与眼部中心计算
//! - `blink`: 去抖眨眼检测
//! - `gaze`: 视线方向分类
//! - `aggregator`: 窗口与屏幕时间聚合
//! - `notification`: 休息提醒决策
//! - `pipeline`: 以上组件的组合
//! - `session`: 会话状态

pub mod aggregator;
pub mod blink;
pub mod gaze;
pub mod geometry;
pub mod notification;
pub mod pipeline;
pub mod session;
pub mod types;

pub use aggregator::{MetricsAggregator, WindowClosed};
pub use blink::BlinkDetector;
pub use gaze::GazeClassifier;
pub use notification::{
    AlertChannel, AlertMode, BreakAlert, NotificationPolicy, BREAK_ALERT_MESSAGE,
};
pub use pipeline::{AggregationOutcome, DetectionOutcome, Pipeline};
pub use session::Session;
pub use types::{BlinkEvent, Eye, GazeState, LandmarkFrame, MetricsSnapshot, Point};

use crate::store::StoreError;

/// Durable total screen time keyed by an opaque user id.
pub trait ScreenTimeStore: Send + Sync {
    /// Missing key yields `0.0`.
    fn load_total(&self, user_id: &str) -> Result<f64, StoreError>;
    fn save_total(&self, user_id: &str, total: f64) -> Result<(), StoreError>;
}
