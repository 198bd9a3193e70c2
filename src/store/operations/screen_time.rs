use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::tracking::ScreenTimeStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTimeTotal {
    pub user_id: String,
    pub total_seconds: f64,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn get_screen_time(&self, user_id: &str) -> Result<Option<ScreenTimeTotal>, StoreError> {
        let key = keys::screen_time_key(user_id)?;
        match self.screen_time.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_screen_time(&self, user_id: &str, total_seconds: f64) -> Result<(), StoreError> {
        if !total_seconds.is_finite() || total_seconds < 0.0 {
            return Err(StoreError::Validation(format!(
                "screen time total must be a non-negative number, got {total_seconds}"
            )));
        }
        let key = keys::screen_time_key(user_id)?;
        let record = ScreenTimeTotal {
            user_id: user_id.to_string(),
            total_seconds,
            updated_at: Utc::now(),
        };
        self.screen_time
            .insert(key.as_bytes(), Self::serialize(&record)?)?;
        Ok(())
    }
}

impl ScreenTimeStore for Store {
    fn load_total(&self, user_id: &str) -> Result<f64, StoreError> {
        Ok(self
            .get_screen_time(user_id)?
            .map_or(0.0, |record| record.total_seconds))
    }

    fn save_total(&self, user_id: &str, total: f64) -> Result<(), StoreError> {
        self.set_screen_time(user_id, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str) -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::open(tmp.path().join(name).to_str().unwrap()).unwrap();
        (tmp, store)
    }

    #[test]
    fn round_trip_total() {
        let (_tmp, store) = store("screen_round_trip.sled");
        store.save_total("u1", 42.5).unwrap();
        assert_eq!(store.load_total("u1").unwrap(), 42.5);
    }

    #[test]
    fn unknown_user_loads_zero() {
        let (_tmp, store) = store("screen_unknown.sled");
        assert_eq!(store.load_total("nobody").unwrap(), 0.0);
    }

    #[test]
    fn totals_are_partitioned_by_user() {
        let (_tmp, store) = store("screen_partition.sled");
        store.save_total("a", 1.0).unwrap();
        store.save_total("b", 2.0).unwrap();
        assert_eq!(store.load_total("a").unwrap(), 1.0);
        assert_eq!(store.load_total("b").unwrap(), 2.0);
    }

    #[test]
    fn rejects_invalid_totals() {
        let (_tmp, store) = store("screen_invalid.sled");
        assert!(matches!(
            store.save_total("u1", f64::NAN),
            Err(StoreError::Validation(_))
        ));
        assert!(store.save_total("u1", -1.0).is_err());
    }
}
