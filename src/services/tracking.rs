use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;

use crate::config::TrackingConfig;
use crate::services::events::TrackingEvent;
use crate::services::landmark_source::{LandmarkSource, LatestFrameSource};
use crate::store::{keys, StoreError};
use crate::tracking::{
    AlertChannel, LandmarkFrame, MetricsSnapshot, Pipeline, ScreenTimeStore, Session,
};
use crate::workers::{self, Scheduler, WorkerError, WorkerName};

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("tracking already active for user {0}")]
    AlreadyActive(String),
    #[error("tracking not active for user {0}")]
    NotActive(String),
    #[error("active session limit reached ({0})")]
    TooManySessions(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

struct ActiveSession {
    session: Arc<Mutex<Session>>,
    source: Arc<LatestFrameSource>,
    scheduler: Scheduler,
}

/// Owns every active tracking session and its two schedules.
///
/// A session is created by `start`, seeded with the persisted total, and
/// torn down by `stop`, which cancels both schedules and flushes the total.
pub struct TrackingService {
    pipeline: Pipeline,
    config: TrackingConfig,
    totals: Arc<dyn ScreenTimeStore>,
    alerts: Arc<dyn AlertChannel>,
    events: broadcast::Sender<TrackingEvent>,
    sessions: Mutex<HashMap<String, ActiveSession>>,
    max_active: usize,
}

impl TrackingService {
    pub fn new(
        config: &TrackingConfig,
        totals: Arc<dyn ScreenTimeStore>,
        alerts: Arc<dyn AlertChannel>,
        events: broadcast::Sender<TrackingEvent>,
        max_active: usize,
    ) -> Self {
        Self {
            pipeline: Pipeline::from_config(config),
            config: config.clone(),
            totals,
            alerts,
            events,
            sessions: Mutex::new(HashMap::new()),
            max_active,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.events.subscribe()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_active(&self, user_id: &str) -> bool {
        self.sessions.lock().await.contains_key(user_id)
    }

    pub async fn start(&self, user_id: &str) -> Result<MetricsSnapshot, TrackingError> {
        keys::validate_user_id(user_id)?;

        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(user_id) {
            tracing::warn!(user_id, "Rejected duplicate tracking start");
            return Err(TrackingError::AlreadyActive(user_id.to_string()));
        }
        if sessions.len() >= self.max_active {
            return Err(TrackingError::TooManySessions(self.max_active));
        }

        let seed_total = self.load_total(user_id);
        let session = Arc::new(Mutex::new(
            self.pipeline.new_session(seed_total, Instant::now()),
        ));
        let source = Arc::new(LatestFrameSource::new(self.config.frame_stale_after()));
        let mut scheduler = Scheduler::new();

        self.start_detection(&mut scheduler, user_id, &session, &source)?;
        if let Err(e) = self.start_aggregation(&mut scheduler, user_id, &session) {
            scheduler.stop_all().await;
            return Err(e.into());
        }

        let snapshot = session.lock().await.snapshot();
        sessions.insert(
            user_id.to_string(),
            ActiveSession {
                session,
                source,
                scheduler,
            },
        );

        tracing::info!(user_id, seed_total, "Tracking started");
        Ok(snapshot)
    }

    /// Stops both schedules, then flushes the total unless it is still zero.
    ///
    /// The entry leaves the map before teardown, so other users are not
    /// blocked while this session's in-flight ticks drain.
    pub async fn stop(&self, user_id: &str) -> Result<MetricsSnapshot, TrackingError> {
        let active = self.sessions.lock().await.remove(user_id);
        let Some(active) = active else {
            return Err(TrackingError::NotActive(user_id.to_string()));
        };

        let snapshot = self.teardown(user_id, active).await;
        tracing::info!(
            user_id,
            session_screen_time = snapshot.session_screen_time,
            total_screen_time = snapshot.total_screen_time,
            "Tracking stopped"
        );
        Ok(snapshot)
    }

    pub async fn stop_all(&self) {
        let drained: Vec<(String, ActiveSession)> = self.sessions.lock().await.drain().collect();
        for (user_id, active) in drained {
            self.teardown(&user_id, active).await;
        }
        tracing::info!("All tracking sessions stopped");
    }

    pub async fn push_frame(&self, user_id: &str, frame: LandmarkFrame) -> Result<(), TrackingError> {
        let sessions = self.sessions.lock().await;
        let active = sessions
            .get(user_id)
            .ok_or_else(|| TrackingError::NotActive(user_id.to_string()))?;
        active.source.push(frame, Instant::now());
        Ok(())
    }

    pub async fn snapshot(&self, user_id: &str) -> Result<MetricsSnapshot, TrackingError> {
        let session = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(user_id)
                .map(|active| active.session.clone())
                .ok_or_else(|| TrackingError::NotActive(user_id.to_string()))?
        };
        let snapshot = session.lock().await.snapshot();
        Ok(snapshot)
    }

    fn start_detection(
        &self,
        scheduler: &mut Scheduler,
        user_id: &str,
        session: &Arc<Mutex<Session>>,
        source: &Arc<LatestFrameSource>,
    ) -> Result<(), WorkerError> {
        let pipeline = self.pipeline;
        let user_id: Arc<str> = Arc::from(user_id);
        let session = session.clone();
        let source: Arc<dyn LandmarkSource> = source.clone();

        scheduler.start(
            WorkerName::Detection,
            self.config.detection_period(),
            move || {
                let user_id = user_id.clone();
                let session = session.clone();
                let source = source.clone();
                async move {
                    workers::detection::run(&user_id, &pipeline, &session, source.as_ref()).await;
                }
            },
        )
    }

    fn start_aggregation(
        &self,
        scheduler: &mut Scheduler,
        user_id: &str,
        session: &Arc<Mutex<Session>>,
    ) -> Result<(), WorkerError> {
        let pipeline = self.pipeline;
        let user_id: Arc<str> = Arc::from(user_id);
        let session = session.clone();
        let alerts = self.alerts.clone();
        let events = self.events.clone();

        scheduler.start(
            WorkerName::Aggregation,
            self.config.aggregation_period(),
            move || {
                let user_id = user_id.clone();
                let session = session.clone();
                let alerts = alerts.clone();
                let events = events.clone();
                async move {
                    workers::aggregation::run(
                        &user_id,
                        &pipeline,
                        &session,
                        alerts.as_ref(),
                        &events,
                    )
                    .await;
                }
            },
        )
    }

    fn load_total(&self, user_id: &str) -> f64 {
        match self.totals.load_total(user_id) {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to load screen time total, starting from 0");
                0.0
            }
        }
    }

    async fn teardown(&self, user_id: &str, mut active: ActiveSession) -> MetricsSnapshot {
        active.scheduler.stop_all().await;
        let snapshot = active.session.lock().await.snapshot();

        // 从未累计过时间的会话不写回，避免用 0 覆盖已保存的值
        if snapshot.total_screen_time > 0.0 {
            if let Err(e) = self.totals.save_total(user_id, snapshot.total_screen_time) {
                tracing::error!(error = %e, user_id, "Failed to save screen time total");
            }
        } else {
            tracing::debug!(user_id, "Screen time total is zero, skipping save");
        }

        snapshot
    }
}
