use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_AGGREGATION_PERIOD_MS, DEFAULT_BLINK_DEBOUNCE_MS, DEFAULT_BPM_ALERT_THRESHOLD,
    DEFAULT_BPM_WINDOW_SECS, DEFAULT_DETECTION_PERIOD_MS, DEFAULT_EAR_THRESHOLD,
    DEFAULT_FRAME_STALE_MS, DEFAULT_GAZE_THRESHOLD_DEG,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub tracking: TrackingConfig,
    pub limits: LimitsConfig,
}

/// Empirical thresholds and tick periods of the metrics pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub ear_threshold: f64,
    pub blink_debounce_ms: u64,
    pub gaze_threshold_deg: f64,
    pub window_secs: u64,
    pub bpm_alert_threshold: u32,
    pub detection_period_ms: u64,
    pub aggregation_period_ms: u64,
    pub frame_stale_ms: u64,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_active_sessions: usize,
    pub max_sse_connections: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD,
            blink_debounce_ms: DEFAULT_BLINK_DEBOUNCE_MS,
            gaze_threshold_deg: DEFAULT_GAZE_THRESHOLD_DEG,
            window_secs: DEFAULT_BPM_WINDOW_SECS,
            bpm_alert_threshold: DEFAULT_BPM_ALERT_THRESHOLD,
            detection_period_ms: DEFAULT_DETECTION_PERIOD_MS,
            aggregation_period_ms: DEFAULT_AGGREGATION_PERIOD_MS,
            frame_stale_ms: DEFAULT_FRAME_STALE_MS,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: 256,
            max_sse_connections: 512,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            sled_path: "./data/eyedentify.sled".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            tracking: TrackingConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl TrackingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ear_threshold: env_or_parse("EAR_THRESHOLD", defaults.ear_threshold),
            blink_debounce_ms: env_or_parse("BLINK_DEBOUNCE_MS", defaults.blink_debounce_ms),
            gaze_threshold_deg: env_or_parse("GAZE_THRESHOLD_DEG", defaults.gaze_threshold_deg),
            window_secs: env_or_parse("BPM_WINDOW_SECS", defaults.window_secs),
            bpm_alert_threshold: env_or_parse(
                "BPM_ALERT_THRESHOLD",
                defaults.bpm_alert_threshold,
            ),
            detection_period_ms: env_or_parse(
                "DETECTION_PERIOD_MS",
                defaults.detection_period_ms,
            ),
            aggregation_period_ms: env_or_parse(
                "AGGREGATION_PERIOD_MS",
                defaults.aggregation_period_ms,
            ),
            frame_stale_ms: env_or_parse("FRAME_STALE_MS", defaults.frame_stale_ms),
        }
        .validated()
    }

    /// Replace out-of-range values with their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.ear_threshold.is_finite() && self.ear_threshold > 0.0) {
            tracing::warn!(value = self.ear_threshold, "Invalid EAR_THRESHOLD, using default");
            self.ear_threshold = defaults.ear_threshold;
        }
        if !(self.gaze_threshold_deg.is_finite() && (0.0..90.0).contains(&self.gaze_threshold_deg))
        {
            tracing::warn!(
                value = self.gaze_threshold_deg,
                "Invalid GAZE_THRESHOLD_DEG, using default"
            );
            self.gaze_threshold_deg = defaults.gaze_threshold_deg;
        }
        if self.window_secs == 0 {
            tracing::warn!("BPM_WINDOW_SECS must be positive, using default");
            self.window_secs = defaults.window_secs;
        }
        if self.detection_period_ms == 0 {
            tracing::warn!("DETECTION_PERIOD_MS must be positive, using default");
            self.detection_period_ms = defaults.detection_period_ms;
        }
        if self.aggregation_period_ms == 0 {
            tracing::warn!("AGGREGATION_PERIOD_MS must be positive, using default");
            self.aggregation_period_ms = defaults.aggregation_period_ms;
        }
        self
    }

    pub fn blink_debounce(&self) -> Duration {
        Duration::from_millis(self.blink_debounce_ms)
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn detection_period(&self) -> Duration {
        Duration::from_millis(self.detection_period_ms)
    }

    pub fn aggregation_period(&self) -> Duration {
        Duration::from_millis(self.aggregation_period_ms)
    }

    pub fn frame_stale_after(&self) -> Duration {
        Duration::from_millis(self.frame_stale_ms)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/eyedentify.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            tracking: TrackingConfig::from_env(),
            limits: LimitsConfig {
                max_active_sessions: env_or_parse("MAX_ACTIVE_SESSIONS", 256_usize),
                max_sse_connections: env_or_parse("MAX_SSE_CONNECTIONS", 512_usize),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "EAR_THRESHOLD",
            "BLINK_DEBOUNCE_MS",
            "BPM_WINDOW_SECS",
            "BPM_ALERT_THRESHOLD",
            "DETECTION_PERIOD_MS",
            "ENABLE_FILE_LOGS",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.tracking, TrackingConfig::default());
        assert_eq!(cfg.tracking.ear_threshold, 0.26);
        assert_eq!(cfg.tracking.bpm_alert_threshold, 10);
        assert!(!cfg.enable_file_logs);
    }

    #[test]
    fn parses_tracking_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("EAR_THRESHOLD", "0.21");
        env::set_var("BPM_WINDOW_SECS", "30");
        env::set_var("BPM_ALERT_THRESHOLD", "8");

        let cfg = Config::from_env();
        assert_eq!(cfg.tracking.ear_threshold, 0.21);
        assert_eq!(cfg.tracking.window(), Duration::from_secs(30));
        assert_eq!(cfg.tracking.bpm_alert_threshold, 8);
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("EAR_THRESHOLD", "-1");
        env::set_var("DETECTION_PERIOD_MS", "0");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.tracking.ear_threshold, 0.26);
        assert_eq!(cfg.tracking.detection_period(), Duration::from_millis(300));
        clear_keys(managed_keys());
    }

    #[test]
    fn bool_flags_parse() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("ENABLE_FILE_LOGS", "yes");
        assert!(Config::from_env().enable_file_logs);
        clear_keys(managed_keys());
    }
}
