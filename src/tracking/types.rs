use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// 关键点坐标（源图像坐标系）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 单眼的 6 个有序关键点
///
/// 顺序固定：
/// - 0: 外眼角
/// - 1: 上眼睑（外侧）
/// - 2: 上眼睑（内侧）
/// - 3: 内眼角
/// - 4: 下眼睑（内侧）
/// - 5: 下眼睑（外侧）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Eye(pub [Point; 6]);

impl Eye {
    pub fn new(points: [Point; 6]) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point; 6] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(Point::is_finite)
    }
}

/// One detection tick worth of landmark output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkFrame {
    pub face_present: bool,
    #[serde(default)]
    pub left_eye: Option<Eye>,
    #[serde(default)]
    pub right_eye: Option<Eye>,
}

impl LandmarkFrame {
    pub fn no_face() -> Self {
        Self::default()
    }

    pub fn with_eyes(left: Eye, right: Eye) -> Self {
        Self {
            face_present: true,
            left_eye: Some(left),
            right_eye: Some(right),
        }
    }

    /// Both eyes, only when a face is reported.
    pub fn eyes(&self) -> Option<(&Eye, &Eye)> {
        if !self.face_present {
            return None;
        }
        match (&self.left_eye, &self.right_eye) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }
}

/// 视线方向
///
/// `Absent` 表示本次检测没有人脸，与 Left/Right 一样不累计屏幕时间，
/// 但对 UI 来说需要区分“离开”与“看向别处”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeState {
    Left,
    Right,
    Center,
    #[default]
    Absent,
}

impl GazeState {
    pub fn is_on_screen(self) -> bool {
        matches!(self, Self::Center)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Absent => "absent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkEvent {
    pub at: Instant,
}

/// Read-only view published after every aggregation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub bpm: u32,
    pub blinks_in_window: u32,
    pub window_remaining_seconds: f64,
    pub session_screen_time: f64,
    pub total_screen_time: f64,
    pub gaze: GazeState,
    pub windows_closed: u64,
}
