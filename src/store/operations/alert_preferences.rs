use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::tracking::AlertMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPreference {
    pub user_id: String,
    pub mode: AlertMode,
    pub enabled: bool,
}

impl AlertPreference {
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            mode: AlertMode::default(),
            enabled: true,
        }
    }
}

impl Store {
    pub fn get_alert_preference(&self, user_id: &str) -> Result<AlertPreference, StoreError> {
        let key = keys::alert_preference_key(user_id)?;
        match self.alert_preferences.get(key.as_bytes())? {
            Some(raw) => Ok(Self::deserialize(&raw)?),
            None => Ok(AlertPreference::default_for(user_id)),
        }
    }

    pub fn set_alert_preference(&self, preference: &AlertPreference) -> Result<(), StoreError> {
        let key = keys::alert_preference_key(&preference.user_id)?;
        self.alert_preferences
            .insert(key.as_bytes(), Self::serialize(preference)?)?;
        Ok(())
    }
}
