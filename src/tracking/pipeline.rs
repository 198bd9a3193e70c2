use std::time::Duration;

use tokio::time::Instant;

use crate::config::TrackingConfig;

use super::aggregator::{MetricsAggregator, WindowClosed};
use super::blink::BlinkDetector;
use super::gaze::GazeClassifier;
use super::geometry::ear;
use super::notification::{BreakAlert, NotificationPolicy};
use super::session::Session;
use super::types::{BlinkEvent, GazeState, LandmarkFrame, MetricsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionOutcome {
    Measured {
        blink: Option<BlinkEvent>,
        gaze: GazeState,
        left_ear: f64,
        right_ear: f64,
    },
    /// No face this tick; gaze forced to `Absent`.
    NoFace,
    /// Face reported but eyes missing or degenerate; nothing updated.
    Unreliable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    pub elapsed: Duration,
    pub closed: Option<WindowClosed>,
    pub alert: Option<BreakAlert>,
    pub snapshot: MetricsSnapshot,
}

/// Stateless wiring of the five components; all mutable state is in `Session`.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    blink: BlinkDetector,
    gaze: GazeClassifier,
    aggregator: MetricsAggregator,
    policy: NotificationPolicy,
}

impl Pipeline {
    pub fn new(
        blink: BlinkDetector,
        gaze: GazeClassifier,
        aggregator: MetricsAggregator,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            blink,
            gaze,
            aggregator,
            policy,
        }
    }

    pub fn from_config(cfg: &TrackingConfig) -> Self {
        Self::new(
            BlinkDetector::new(cfg.ear_threshold, cfg.blink_debounce()),
            GazeClassifier::new(cfg.gaze_threshold_deg),
            MetricsAggregator::new(cfg.window()),
            NotificationPolicy::new(cfg.bpm_alert_threshold),
        )
    }

    pub fn new_session(&self, seed_total: f64, now: Instant) -> Session {
        Session::new(seed_total, self.aggregator.window(), now)
    }

    /// Detection over a frame that is always a new sample.
    pub fn on_detection_tick(
        &self,
        session: &mut Session,
        frame: &LandmarkFrame,
        now: Instant,
    ) -> DetectionOutcome {
        self.detect(session, frame, true, now)
    }

    /// Detection over a frame pulled from a source that may hand out the same
    /// sample on several ticks. Gaze follows every tick; blink detection runs
    /// only the first time a given `sequence` is seen.
    pub fn on_frame_sample(
        &self,
        session: &mut Session,
        frame: &LandmarkFrame,
        sequence: u64,
        now: Instant,
    ) -> DetectionOutcome {
        let unseen = session.last_frame_sequence != Some(sequence);
        session.last_frame_sequence = Some(sequence);
        self.detect(session, frame, unseen, now)
    }

    fn detect(
        &self,
        session: &mut Session,
        frame: &LandmarkFrame,
        evaluate_blink: bool,
        now: Instant,
    ) -> DetectionOutcome {
        if !frame.face_present {
            session.gaze = GazeState::Absent;
            return DetectionOutcome::NoFace;
        }

        let Some((left, right)) = frame.eyes() else {
            return DetectionOutcome::Unreliable;
        };
        let (Some(left_ear), Some(right_ear)) = (ear(left), ear(right)) else {
            return DetectionOutcome::Unreliable;
        };

        let blink = if evaluate_blink {
            self.blink.evaluate(session, left_ear, right_ear, now)
        } else {
            None
        };
        let gaze = self.gaze.classify(left, right);
        session.gaze = gaze;

        DetectionOutcome::Measured {
            blink,
            gaze,
            left_ear,
            right_ear,
        }
    }

    /// Elapsed time is measured from the previous aggregation tick (or the
    /// session start), never assumed from the nominal period.
    pub fn on_aggregation_tick(&self, session: &mut Session, now: Instant) -> AggregationOutcome {
        let elapsed = now.saturating_duration_since(session.last_aggregated_at);
        session.last_aggregated_at = now;

        let closed = self.aggregator.tick(session, elapsed);
        let alert = closed.and_then(|c| self.policy.on_window_closed(c.bpm));

        AggregationOutcome {
            elapsed,
            closed,
            alert,
            snapshot: session.snapshot(),
        }
    }
}
