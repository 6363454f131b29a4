use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 設定檔位置（目前工作目錄）
pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    pub fn new() -> Result<Self> {
        let settings = match load_settings_from(Path::new(SETTINGS_FILE)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("讀取設定失敗，改用預設值: {e:#}");
                UserSettings::default()
            }
        };

        Ok(Self { settings })
    }
}

pub fn load_settings_from(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    let settings: UserSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    settings
        .highlight
        .validate()
        .with_context(|| format!("Invalid highlight settings in {}", path.display()))?;

    Ok(settings)
}
