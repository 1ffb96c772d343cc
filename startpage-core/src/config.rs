use crate::error::StartPageError;
use crate::input::GestureConfig;
use crate::layout::BreakpointTable;
use crate::notification::NotificationConfig;
use crate::transition::TransitionConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const API_URL_ENV: &str = "STARTPAGE_API_URL";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StartPageConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub gestures: GestureConfig,
    pub transition: TransitionConfig,
    pub breakpoints: BreakpointTable,
    pub notifications: NotificationConfig,
}

impl Default for StartPageConfig {
    fn default() -> Self {
        StartPageConfig {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            gestures: GestureConfig::default(),
            transition: TransitionConfig::default(),
            breakpoints: BreakpointTable::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl StartPageConfig {
    /// Platform config file location, e.g. `~/.config/startpage/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "startpage").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the platform config file if it exists, then apply env overrides.
    pub fn load() -> Result<Self, StartPageError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                debug!(config_file = %path.display(), "No config file found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, StartPageError> {
        let content = fs::read_to_string(path)?;
        let config: StartPageConfig = serde_json::from_str(&content)
            .map_err(|e| StartPageError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!(config_file = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(api_base_url = %url, "API URL overridden from environment");
                self.api_base_url = url.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), StartPageError> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| StartPageError::Config(format!("api_base_url: {}", e)))?;
        if self.request_timeout_secs == 0 {
            return Err(StartPageError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.gestures.swipe_threshold_px < 0.0 || !self.gestures.drag_damping.is_finite() {
            return Err(StartPageError::Config(
                "gesture settings out of range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
