use serde_json::{json, Value};

use eyedentify::tracking::{Eye, LandmarkFrame, Point};

/// Six landmarks around `(cx, cy)`; `openness` is the half height of the lids.
pub fn eye_at(cx: f64, cy: f64, openness: f64) -> Eye {
    Eye::new([
        Point::new(cx - 15.0, cy),
        Point::new(cx - 5.0, cy - openness),
        Point::new(cx + 5.0, cy - openness),
        Point::new(cx + 15.0, cy),
        Point::new(cx + 5.0, cy + openness),
        Point::new(cx - 5.0, cy + openness),
    ])
}

/// Level eyes, wide open (EAR ≈ 0.33).
pub fn open_frame() -> LandmarkFrame {
    LandmarkFrame::with_eyes(eye_at(100.0, 100.0, 5.0), eye_at(160.0, 100.0, 5.0))
}

/// Level eyes, nearly shut (EAR ≈ 0.03).
pub fn closed_frame() -> LandmarkFrame {
    LandmarkFrame::with_eyes(eye_at(100.0, 100.0, 0.5), eye_at(160.0, 100.0, 0.5))
}

/// Eye line tilted by roughly `degrees`.
pub fn tilted_frame(degrees: f64) -> LandmarkFrame {
    let rad = degrees.to_radians();
    let dx = 60.0 * rad.cos();
    let dy = 60.0 * rad.sin();
    LandmarkFrame::with_eyes(
        eye_at(100.0, 100.0, 5.0),
        eye_at(100.0 + dx, 100.0 + dy, 5.0),
    )
}

pub fn frame_json(frame: &LandmarkFrame) -> Value {
    serde_json::to_value(frame).expect("frame json")
}

pub fn no_face_json() -> Value {
    json!({ "facePresent": false })
}
