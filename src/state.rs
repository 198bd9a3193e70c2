use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::services::alert_channel::StoreAlertChannel;
use crate::services::tracking::TrackingService;
use crate::store::Store;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    tracking: Arc<TrackingService>,
    config: Arc<Config>,
    sse_connections: Arc<AtomicUsize>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config, shutdown_tx: broadcast::Sender<()>) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let alerts = Arc::new(StoreAlertChannel::new(store.clone(), events_tx.clone()));
        let tracking = Arc::new(TrackingService::new(
            &config.tracking,
            store.clone(),
            alerts,
            events_tx,
            config.limits.max_active_sessions,
        ));

        Self {
            store,
            tracking,
            config: Arc::new(config.clone()),
            sse_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn tracking(&self) -> &Arc<TrackingService> {
        &self.tracking
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sse_connections(&self) -> &Arc<AtomicUsize> {
        &self.sse_connections
    }

    pub fn active_sse_connections(&self) -> usize {
        self.sse_connections.load(Ordering::Relaxed)
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_tx(&self) -> &broadcast::Sender<()> {
        &self.shutdown_tx
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
