//! Persisted settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sniff_scan::ScanSettings;
use sniff_sim::VirtualRadioConfig;
use tracing::warn;

/// Everything the sniffer reads from its settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Scan sequence parameters
    #[serde(default)]
    pub scan: ScanSettings,
    /// Radio used when no hardware is attached
    #[serde(default)]
    pub radio: VirtualRadioConfig,
}

impl Settings {
    /// Get the XDG config directory for the sniffer
    /// Uses $XDG_CONFIG_HOME/tracerfi, falls back to ~/.config/tracerfi
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("tracerfi"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("tracerfi"))
    }

    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from `path`
    ///
    /// A missing file yields defaults. A file that does not parse is reported
    /// and also yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating its directory
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sniff_proto::{ChannelMask, MacAddr};

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sniffer-settings-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&scratch("missing"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("roundtrip");
        let mut settings = Settings::default();
        settings.scan.mask = ChannelMask::US;
        settings.scan.ble_period_ms = 2000;
        settings.radio.mac = MacAddr([0x02, 0, 0, 0, 0, 0x42]);

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = scratch("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_partial_file() {
        let path = scratch("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"scan": {"mask": "uk"}}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.scan.mask, ChannelMask::UK);
        assert_eq!(settings.scan.tfi_transmits, 3);
        assert_eq!(settings.radio, VirtualRadioConfig::default());

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
