use std::time::Duration;

use proptest::prelude::*;
use tokio::time::Instant;

use eyedentify::config::TrackingConfig;
use eyedentify::tracking::geometry::ear;
use eyedentify::tracking::{
    Eye, GazeClassifier, GazeState, LandmarkFrame, MetricsAggregator, Pipeline, Point, Session,
};

fn point() -> impl Strategy<Value = Point> {
    (-1000.0_f64..1000.0, -1000.0_f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
}

fn eye() -> impl Strategy<Value = Eye> {
    prop::array::uniform6(point()).prop_map(Eye::new)
}

fn gaze() -> impl Strategy<Value = GazeState> {
    prop_oneof![
        Just(GazeState::Left),
        Just(GazeState::Right),
        Just(GazeState::Center),
        Just(GazeState::Absent),
    ]
}

proptest! {
    #[test]
    fn pt_ear_is_non_negative_when_defined(e in eye()) {
        if let Some(value) = ear(&e) {
            prop_assert!(value >= 0.0);
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn pt_gaze_classification_is_deterministic(angle in -180.0_f64..180.0, t in 0.0_f64..90.0) {
        let classifier = GazeClassifier::new(t);
        let first = classifier.classify_angle(angle);
        prop_assert_eq!(first, classifier.classify_angle(angle));
        prop_assert_ne!(first, GazeState::Absent);
        if angle.abs() <= t {
            prop_assert_eq!(first, GazeState::Center);
        }
    }

    #[test]
    fn pt_screen_time_only_grows_while_centered(
        steps in prop::collection::vec((gaze(), 0_u64..3000), 1..80),
        seed in 0.0_f64..10_000.0,
    ) {
        let aggregator = MetricsAggregator::new(Duration::from_secs(60));
        let mut session = Session::new(seed, aggregator.window(), Instant::now());
        let mut expected = 0.0;

        for (gaze, ms) in steps {
            session.gaze = gaze;
            let before_total = session.total_screen_time;
            let before_session = session.session_screen_time;
            let elapsed = Duration::from_millis(ms);
            aggregator.tick(&mut session, elapsed);

            if gaze == GazeState::Center {
                expected += elapsed.as_secs_f64();
                prop_assert!(session.total_screen_time >= before_total);
            } else {
                prop_assert_eq!(session.total_screen_time, before_total);
                prop_assert_eq!(session.session_screen_time, before_session);
            }
            prop_assert!(session.window_remaining >= 0.0);
            prop_assert!(session.window_remaining <= session.window_length());
        }

        prop_assert!((session.session_screen_time - expected).abs() < 1e-6);
        prop_assert!((session.total_screen_time - (seed + expected)).abs() < 1e-6);
    }

    #[test]
    fn pt_blinks_respect_debounce(closed in prop::collection::vec(any::<bool>(), 1..200)) {
        let pipeline = Pipeline::from_config(&TrackingConfig::default());
        let t0 = Instant::now();
        let mut session = pipeline.new_session(0.0, t0);
        let mut last_blink: Option<Instant> = None;

        for (i, is_closed) in closed.into_iter().enumerate() {
            let now = t0 + Duration::from_millis(100 * i as u64);
            let opening = if is_closed { 0.5 } else { 5.0 };
            let frame = frame_with_opening(opening);
            let before = session.blink_count_in_window;
            pipeline.on_detection_tick(&mut session, &frame, now);

            if session.blink_count_in_window > before {
                if let Some(prev) = last_blink {
                    prop_assert!(now.duration_since(prev) >= Duration::from_millis(300));
                }
                last_blink = Some(now);
            }
        }
    }
}

fn frame_with_opening(opening: f64) -> LandmarkFrame {
    let eye_at = |cx: f64| {
        Eye::new([
            Point::new(cx - 15.0, 100.0),
            Point::new(cx - 5.0, 100.0 - opening),
            Point::new(cx + 5.0, 100.0 - opening),
            Point::new(cx + 15.0, 100.0),
            Point::new(cx + 5.0, 100.0 + opening),
            Point::new(cx - 5.0, 100.0 + opening),
        ])
    };
    LandmarkFrame::with_eyes(eye_at(100.0), eye_at(160.0))
}
