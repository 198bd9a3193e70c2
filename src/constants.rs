/// 双眼 EAR 均低于此值视为闭眼
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.26;

/// 两次眨眼登记之间的最小间隔（毫秒）
pub const DEFAULT_BLINK_DEBOUNCE_MS: u64 = 300;

/// 两眼连线倾角超过此角度视为看向侧面
pub const DEFAULT_GAZE_THRESHOLD_DEG: f64 = 15.0;

/// 眨眼统计窗口（秒）
pub const DEFAULT_BPM_WINDOW_SECS: u64 = 60;

/// 窗口眨眼数不高于此值时提醒休息
pub const DEFAULT_BPM_ALERT_THRESHOLD: u32 = 10;

/// 检测周期（毫秒）
pub const DEFAULT_DETECTION_PERIOD_MS: u64 = 300;

/// 聚合周期（毫秒）
pub const DEFAULT_AGGREGATION_PERIOD_MS: u64 = 1000;

/// 关键点帧超过此时长未更新即视为无人脸
pub const DEFAULT_FRAME_STALE_MS: u64 = 1500;

/// 告警列表默认条数
pub const DEFAULT_ALERT_PAGE_SIZE: usize = 20;

/// 告警列表最大条数
pub const MAX_ALERT_PAGE_SIZE: usize = 100;

/// 每个用户保留的休息提醒条数上限，超出时删除最旧的
pub const MAX_BREAK_ALERTS_PER_USER: usize = 200;
