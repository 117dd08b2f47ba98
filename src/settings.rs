use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// IRS standard mileage rate for 2017, in dollars per mile.
pub const IRS_MILEAGE_RATE: f64 = 0.535;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_mileage_rate")]
    pub mileage_rate: f64,
    #[serde(default = "default_start_time")]
    pub default_start_time: String,
    #[serde(default = "default_end_time")]
    pub default_end_time: String,
}

fn default_mileage_rate() -> f64 {
    IRS_MILEAGE_RATE
}

fn default_start_time() -> String {
    "08:00AM".to_string()
}

fn default_end_time() -> String {
    "05:00PM".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mileage_rate: default_mileage_rate(),
            default_start_time: default_start_time(),
            default_end_time: default_end_time(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("everlance2mileiq")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`. A missing file yields defaults; a file that
/// exists but is not valid settings JSON is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content)
        .map_err(|e| ConvertError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}
