//! User configuration.
//!
//! Stored as JSON in ~/.config/ProfileDeck/config.json. A missing or
//! unreadable file yields the defaults.

use deck_launch::StoreLinks;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "ProfileDeck";
const CONFIG_FILE: &str = "config.json";

/// Environment override for the snapshot file.
pub const SNAPSHOT_ENV: &str = "PROFILEDECK_SNAPSHOT";
/// Environment override for the device serial (same variable adb uses).
pub const SERIAL_ENV: &str = "ANDROID_SERIAL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Path or name of the adb executable.
    pub adb_path: String,
    /// Device serial, when more than one device is attached.
    pub serial: Option<String>,
    /// List system apps too. Off by default to reduce noise.
    pub include_system_apps: bool,
    /// Marketplace endpoints for the store fallback.
    pub store: StoreLinks,
    /// Read the inventory from a snapshot file instead of a device.
    pub snapshot: Option<PathBuf>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            serial: None,
            include_system_apps: false,
            store: StoreLinks::default(),
            snapshot: None,
        }
    }
}

impl DeckConfig {
    /// Default config location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from config file, or return default if not found
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save to config file
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Apply environment overrides on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(SERIAL_ENV).ok(),
            std::env::var(SNAPSHOT_ENV).ok(),
        )
    }

    fn with_overrides(mut self, serial: Option<String>, snapshot: Option<String>) -> Self {
        if let Some(serial) = serial.filter(|s| !s.is_empty()) {
            self.serial = Some(serial);
        }
        if let Some(snapshot) = snapshot.filter(|s| !s.is_empty()) {
            self.snapshot = Some(PathBuf::from(snapshot));
        }
        self
    }
}
