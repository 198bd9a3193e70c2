pub mod alert_preferences;
pub mod break_alerts;
pub mod screen_time;
