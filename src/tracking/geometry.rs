//! EAR (Eye Aspect Ratio) 计算模块
//!
//! 基于 6 点眼部关键点计算 EAR，EAR 越小眼睛越接近闭合。
//! 公式: EAR = (|p1.y - p5.y| + |p2.y - p4.y|) / (2 * |p0.x - p3.x|)
//!
//! 只使用垂直方向的 y 差和水平方向的 x 差，不是欧氏距离。

use super::types::{Eye, Point};

/// 计算单眼 EAR
///
/// 眼角水平距离为 0（关键点退化）时返回 `None`，调用方应当把这一帧
/// 视为“无可靠测量”，跳过眨眼与视线更新。
pub fn ear(eye: &Eye) -> Option<f64> {
    let p = eye.points();

    let vertical = (p[1].y - p[5].y).abs() + (p[2].y - p[4].y).abs();
    let horizontal = (p[0].x - p[3].x).abs();
    if horizontal == 0.0 {
        return None;
    }

    let value = vertical / (2.0 * horizontal);
    value.is_finite().then_some(value)
}

/// 6 个关键点的几何中心
pub fn centroid(eye: &Eye) -> Point {
    let (sx, sy) = eye
        .points()
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = eye.points().len() as f64;
    Point::new(sx / n, sy / n)
}
