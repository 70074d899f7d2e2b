use crate::classify::Thresholds;
use crate::error::{PadError, Result};
use crate::gamepad::controllers;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "padlink_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: Thresholds,
    /// Controller slots to poll
    pub controllers: Vec<u32>,
    pub poll_interval_ms: u64,
    /// Drive the motors from trigger pressure
    pub rumble_with_triggers: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            controllers: controllers().collect(),
            poll_interval_ms: 16,
            rumble_with_triggers: false,
        }
    }
}

impl MonitorConfig {
    /// Read the config at `path`, or at [`Self::config_path`] when none is
    /// given. A missing file gives `None` quietly; a broken one is logged.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        let path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if !path.is_file() {
            log::debug!("No config at {:?}, using defaults", path);
            return None;
        }
        Self::read(&path)
            .inspect(|_| log::info!("Loaded config from {:?}", path))
            .inspect_err(|e| log::error!("Ignoring {:?}: {}", path, e))
            .ok()
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PadError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| PadError::Config(e.to_string()))
    }

    /// `padlink_config.json` beside the executable.
    pub fn config_path() -> PathBuf {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        dir.unwrap_or_default().join(CONFIG_FILENAME)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
