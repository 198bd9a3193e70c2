//! 客户端上报数据的校验
//! 坐标必须是有限数；报告了人脸的帧必须同时带上两只眼睛。

use crate::tracking::LandmarkFrame;

/// 坐标绝对值上限，超出视为客户端数据损坏
pub const MAX_COORDINATE: f64 = 1.0e6;

pub fn validate_frame(frame: &LandmarkFrame) -> Result<(), &'static str> {
    if !frame.face_present {
        // 无人脸帧允许附带残留关键点，检测时会被忽略
        return Ok(());
    }

    let (Some(left), Some(right)) = (&frame.left_eye, &frame.right_eye) else {
        return Err("facePresent 为 true 时必须同时提供 leftEye 和 rightEye");
    };

    for eye in [left, right] {
        if !eye.is_finite() {
            return Err("关键点坐标必须是有限数");
        }
        if eye
            .points()
            .iter()
            .any(|p| p.x.abs() > MAX_COORDINATE || p.y.abs() > MAX_COORDINATE)
        {
            return Err("关键点坐标超出范围");
        }
    }
    Ok(())
}

/// 分页大小：缺省或 0 用默认值，超过上限时截断
pub fn clamp_page_size(requested: Option<usize>, default: usize, max: usize) -> usize {
    match requested {
        None | Some(0) => default,
        Some(n) => n.min(max),
    }
}
