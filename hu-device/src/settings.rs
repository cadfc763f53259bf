//! Application settings

use std::path::PathBuf;

use hu_library::selection::config_dir;
use hu_link::LinkConfig;
use hu_sim::VirtualPhoneConfig;
use serde::{Deserialize, Serialize};

/// Name of the per-user config directory
pub const APP_DIR: &str = "hu-device";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Link session configuration
    #[serde(default)]
    pub link: LinkConfig,
    /// Main loop period in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Notification size of the simulated radio
    #[serde(default = "default_mtu")]
    pub mtu: usize,
    /// How long the scripted session runs, in seconds
    #[serde(default = "default_demo_duration")]
    pub demo_duration_secs: u64,
    /// Ticks between scripted browsing steps
    #[serde(default = "default_step_ticks")]
    pub step_ticks: u32,
    /// Keep selection memory on disk instead of in memory
    #[serde(default = "default_true")]
    pub persist_selections: bool,
    /// Simulated phone
    #[serde(default)]
    pub phone: VirtualPhoneConfig,
}

fn default_tick_interval() -> u64 {
    20
}

fn default_mtu() -> usize {
    20
}

fn default_demo_duration() -> u64 {
    10
}

fn default_step_ticks() -> u32 {
    25
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            tick_interval_ms: default_tick_interval(),
            mtu: default_mtu(),
            demo_duration_secs: default_demo_duration(),
            step_ticks: default_step_ticks(),
            persist_selections: true,
            phone: VirtualPhoneConfig::default(),
        }
    }
}

impl Settings {
    /// Get the config directory path
    /// Uses $XDG_CONFIG_HOME if set, otherwise ~/.config (XDG default)
    pub fn config_dir() -> Option<PathBuf> {
        config_dir(APP_DIR)
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path =
            Self::settings_path().ok_or_else(|| "Could not determine settings path".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}
