use std::path::{Path, PathBuf};

use crate::core::paths;
use crate::error::{DlError, DlResult};
use crate::models::settings::AppSettings;

const SETTINGS_FILE: &str = "settings.json";

pub fn default_settings_path() -> Option<PathBuf> {
    paths::app_config_dir().map(|d| d.join(SETTINGS_FILE))
}

/// An explicit path must exist and parse; the default location is optional.
pub fn load_settings(explicit: Option<&Path>) -> DlResult<AppSettings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    match default_settings_path() {
        Some(path) if path.exists() => read_settings(&path),
        _ => Ok(AppSettings::default()),
    }
}

fn read_settings(path: &Path) -> DlResult<AppSettings> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DlError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str::<AppSettings>(&raw)
        .map_err(|e| DlError::Config(format!("invalid {}: {}", path.display(), e)))
}
