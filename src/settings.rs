use std::{
    path::PathBuf,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::BushouError,
    persistence::{
        get_app_data_dir,
        load_json_or_default,
        save_json,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_address: String,
    pub data_dir: Option<PathBuf>, // dictionary sources; app data dir when unset
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub autoplay_interval_ms: u64,
    pub font_path: Option<PathBuf>, // CJK font for the GUI
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            data_dir: None,
            api_base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 10,
            autoplay_interval_ms: 3000,
            font_path: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        load_json_or_default(SETTINGS_FILE)
    }

    pub fn save(&self) -> Result<(), BushouError> {
        save_json(self, SETTINGS_FILE)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| get_app_data_dir().join("data"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms.max(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"request_timeout_secs": 5}"#).unwrap();
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.bind_address, "127.0.0.1:3000");
        assert_eq!(settings.autoplay_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_intervals_have_floors() {
        let settings =
            Settings { request_timeout_secs: 0, autoplay_interval_ms: 10, ..Settings::default() };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
        assert_eq!(settings.autoplay_interval(), Duration::from_millis(500));
    }
}
