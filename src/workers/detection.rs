//! Detection tick: pull one landmark frame and feed blink/gaze.

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::services::landmark_source::LandmarkSource;
use crate::tracking::{DetectionOutcome, Pipeline, Session};

pub async fn run(
    user_id: &str,
    pipeline: &Pipeline,
    session: &Mutex<Session>,
    source: &dyn LandmarkSource,
) -> DetectionOutcome {
    let now = Instant::now();
    let sampled = source.next_frame(now);

    let outcome = {
        let mut session = session.lock().await;
        pipeline.on_frame_sample(&mut session, &sampled.frame, sampled.sequence, now)
    };

    match outcome {
        DetectionOutcome::Measured {
            blink: Some(_),
            left_ear,
            right_ear,
            ..
        } => {
            tracing::debug!(user_id, left_ear, right_ear, "Blink registered");
        }
        DetectionOutcome::Measured { .. } | DetectionOutcome::NoFace => {}
        DetectionOutcome::Unreliable => {
            tracing::debug!(user_id, "Unreliable landmarks, skipping detection tick");
        }
    }

    outcome
}
