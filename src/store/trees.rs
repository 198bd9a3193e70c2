pub const SCREEN_TIME: &str = "screen_time";
pub const BREAK_ALERTS: &str = "break_alerts";
pub const ALERT_PREFERENCES: &str = "alert_preferences";
