//! 视线方向分类
//!
//! 以两眼中心连线的倾角近似水平视线方向：
//! angle < -T → Left，angle > T → Right，其余（含 ±T 边界）为 Center。

use super::geometry::centroid;
use super::types::{Eye, GazeState};

#[derive(Debug, Clone, Copy)]
pub struct GazeClassifier {
    threshold_deg: f64,
}

impl GazeClassifier {
    pub fn new(threshold_deg: f64) -> Self {
        Self { threshold_deg }
    }

    pub fn classify(&self, left: &Eye, right: &Eye) -> GazeState {
        self.classify_angle(angle_degrees(left, right))
    }

    pub fn classify_angle(&self, angle: f64) -> GazeState {
        if angle < -self.threshold_deg {
            GazeState::Left
        } else if angle > self.threshold_deg {
            GazeState::Right
        } else {
            GazeState::Center
        }
    }
}

/// Angle in degrees of the line from the left eye center to the right eye center.
pub fn angle_degrees(left: &Eye, right: &Eye) -> f64 {
    let lc = centroid(left);
    let rc = centroid(right);
    (rc.y - lc.y).atan2(rc.x - lc.x).to_degrees()
}
