pub mod alert_channel;
pub mod events;
pub mod landmark_source;
pub mod tracking;
