use super::StoreError;

/// User ids are opaque, but `:` is reserved as the key separator.
pub fn validate_user_id(user_id: &str) -> Result<(), StoreError> {
    if user_id.is_empty() || user_id.len() > 128 {
        return Err(StoreError::Validation(
            "user id must be 1-128 characters".to_string(),
        ));
    }
    if user_id.contains(':') {
        return Err(StoreError::Validation(
            "user id must not contain ':'".to_string(),
        ));
    }
    Ok(())
}

pub fn screen_time_key(user_id: &str) -> Result<String, StoreError> {
    validate_user_id(user_id)?;
    Ok(user_id.to_string())
}

pub fn alert_preference_key(user_id: &str) -> Result<String, StoreError> {
    validate_user_id(user_id)?;
    Ok(user_id.to_string())
}

/// Newest first within a user prefix.
pub fn break_alert_key(
    user_id: &str,
    timestamp_ms: i64,
    alert_id: &str,
) -> Result<String, StoreError> {
    validate_user_id(user_id)?;
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    Ok(format!("{}:{:020}:{}", user_id, reverse_ts, alert_id))
}

pub fn break_alert_prefix(user_id: &str) -> Result<String, StoreError> {
    validate_user_id(user_id)?;
    Ok(format!("{}:", user_id))
}
