use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::tracking::LandmarkFrame;

/// One frame handed to a detection tick.
///
/// `sequence` identifies the push that produced the frame (0 when nothing
/// usable is held). Ticks that see the same sequence again are looking at
/// the same camera sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledFrame {
    pub frame: LandmarkFrame,
    pub sequence: u64,
}

impl SampledFrame {
    pub fn no_face() -> Self {
        Self {
            frame: LandmarkFrame::no_face(),
            sequence: 0,
        }
    }
}

/// Supplies the landmark frame for one detection tick. Must not block.
pub trait LandmarkSource: Send + Sync {
    fn next_frame(&self, now: Instant) -> SampledFrame;
}

#[derive(Debug)]
struct Held {
    frame: LandmarkFrame,
    received_at: Instant,
    sequence: u64,
}

/// Keeps the most recent frame pushed by the client.
///
/// A frame is returned by every detection tick until a newer one arrives or it
/// goes stale; a stale or missing frame reads as "no face".
#[derive(Debug)]
pub struct LatestFrameSource {
    latest: Mutex<Option<Held>>,
    stale_after: Duration,
}

impl LatestFrameSource {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            latest: Mutex::new(None),
            stale_after,
        }
    }

    /// 返回本次推送分配的序号，从 1 开始递增
    pub fn push(&self, frame: LandmarkFrame, received_at: Instant) -> u64 {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let sequence = latest.as_ref().map_or(1, |held| held.sequence + 1);
        *latest = Some(Held {
            frame,
            received_at,
            sequence,
        });
        sequence
    }
}

impl LandmarkSource for LatestFrameSource {
    fn next_frame(&self, now: Instant) -> SampledFrame {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        match latest.as_ref() {
            Some(held) if now.saturating_duration_since(held.received_at) <= self.stale_after => {
                SampledFrame {
                    frame: held.frame,
                    sequence: held.sequence,
                }
            }
            _ => SampledFrame::no_face(),
        }
    }
}
