use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_BREAK_ALERTS_PER_USER;
use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::tracking::AlertMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAlertRecord {
    pub id: String,
    pub user_id: String,
    pub bpm: u32,
    pub message: String,
    pub mode: AlertMode,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Inserts the record, then trims the user's history to
    /// `MAX_BREAK_ALERTS_PER_USER` entries.
    pub fn insert_break_alert(&self, record: &BreakAlertRecord) -> Result<(), StoreError> {
        let key = keys::break_alert_key(
            &record.user_id,
            record.created_at.timestamp_millis(),
            &record.id,
        )?;
        self.break_alerts
            .insert(key.as_bytes(), Self::serialize(record)?)?;

        let removed = self.prune_break_alerts(&record.user_id, MAX_BREAK_ALERTS_PER_USER)?;
        if removed > 0 {
            tracing::debug!(user_id = %record.user_id, removed, "Pruned old break alerts");
        }
        Ok(())
    }

    /// 只保留最新的 `keep` 条，返回删除的条数
    pub fn prune_break_alerts(&self, user_id: &str, keep: usize) -> Result<usize, StoreError> {
        let prefix = keys::break_alert_prefix(user_id)?;
        let mut removed = 0;

        // 键按时间倒序排列，跳过前 keep 条即为需要删除的旧记录
        for item in self.break_alerts.scan_prefix(prefix.as_bytes()).skip(keep) {
            let (key, _) = item?;
            self.break_alerts.remove(key)?;
            removed += 1;
        }

        Ok(removed)
    }

    /// Newest first.
    pub fn list_break_alerts(
        &self,
        user_id: &str,
        limit: usize,
        unacknowledged_only: bool,
    ) -> Result<Vec<BreakAlertRecord>, StoreError> {
        let prefix = keys::break_alert_prefix(user_id)?;
        let mut alerts = Vec::new();

        for item in self.break_alerts.scan_prefix(prefix.as_bytes()) {
            let (_, raw) = item?;
            let record: BreakAlertRecord = match Self::deserialize(&raw) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, user_id, "Skipping unreadable break alert");
                    continue;
                }
            };
            if unacknowledged_only && record.acknowledged {
                continue;
            }
            alerts.push(record);
            if alerts.len() >= limit {
                break;
            }
        }

        Ok(alerts)
    }

    pub fn acknowledge_break_alert(
        &self,
        user_id: &str,
        alert_id: &str,
    ) -> Result<BreakAlertRecord, StoreError> {
        let prefix = keys::break_alert_prefix(user_id)?;

        for item in self.break_alerts.scan_prefix(prefix.as_bytes()) {
            let (key, raw) = item?;
            if !key.ends_with(alert_id.as_bytes()) {
                continue;
            }
            let mut record: BreakAlertRecord = Self::deserialize(&raw)?;
            if record.id != alert_id {
                continue;
            }
            record.acknowledged = true;
            self.break_alerts.insert(key, Self::serialize(&record)?)?;
            return Ok(record);
        }

        Err(StoreError::NotFound {
            entity: "break_alert".to_string(),
            key: alert_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(user_id: &str, id: &str, created_at: DateTime<Utc>) -> BreakAlertRecord {
        BreakAlertRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            bpm: 6,
            message: "take a break".to_string(),
            mode: AlertMode::SystemNotification,
            acknowledged: false,
            created_at,
        }
    }

    fn store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::open(tmp.path().join("alerts.sled").to_str().unwrap()).unwrap();
        (tmp, store)
    }

    #[test]
    fn lists_newest_first_with_limit() {
        let (_tmp, store) = store();
        let now = Utc::now();
        store.insert_break_alert(&record("u1", "old", now - Duration::minutes(2))).unwrap();
        store.insert_break_alert(&record("u1", "mid", now - Duration::minutes(1))).unwrap();
        store.insert_break_alert(&record("u1", "new", now)).unwrap();
        store.insert_break_alert(&record("u2", "other", now)).unwrap();

        let ids: Vec<String> = store
            .list_break_alerts("u1", 2, false)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["new".to_string(), "mid".to_string()]);
    }

    #[test]
    fn acknowledge_hides_from_unread_listing() {
        let (_tmp, store) = store();
        store.insert_break_alert(&record("u1", "a1", Utc::now())).unwrap();

        let acked = store.acknowledge_break_alert("u1", "a1").unwrap();
        assert!(acked.acknowledged);
        assert!(store.list_break_alerts("u1", 10, true).unwrap().is_empty());
        assert_eq!(store.list_break_alerts("u1", 10, false).unwrap().len(), 1);
    }

    #[test]
    fn prune_keeps_newest_for_one_user() {
        let (_tmp, store) = store();
        let now = Utc::now();
        for i in 0..5 {
            let id = format!("a{i}");
            store
                .insert_break_alert(&record("u1", &id, now + Duration::seconds(i)))
                .unwrap();
        }
        store.insert_break_alert(&record("u2", "other", now)).unwrap();

        assert_eq!(store.prune_break_alerts("u1", 2).unwrap(), 3);
        let ids: Vec<String> = store
            .list_break_alerts("u1", 10, false)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a4".to_string(), "a3".to_string()]);
        assert_eq!(store.list_break_alerts("u2", 10, false).unwrap().len(), 1);
        assert_eq!(store.prune_break_alerts("u1", 2).unwrap(), 0);
    }

    #[test]
    fn insert_caps_history_per_user() {
        let (_tmp, store) = store();
        let start = Utc::now() - Duration::hours(1);
        for i in 0..(MAX_BREAK_ALERTS_PER_USER as i64 + 5) {
            let id = format!("a{i}");
            store
                .insert_break_alert(&record("u1", &id, start + Duration::seconds(i)))
                .unwrap();
        }

        let alerts = store.list_break_alerts("u1", usize::MAX, false).unwrap();
        assert_eq!(alerts.len(), MAX_BREAK_ALERTS_PER_USER);
        let newest = format!("a{}", MAX_BREAK_ALERTS_PER_USER + 4);
        assert_eq!(alerts[0].id, newest);
        assert!(alerts.iter().all(|r| r.id != "a0"));
    }

    #[test]
    fn acknowledge_unknown_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.acknowledge_break_alert("u1", "missing"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
