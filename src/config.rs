//! Application configuration, stored as JSON in the user's config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "media_feed";
const CONFIG_FILE: &str = "config.json";

pub const MIN_ASSET_LIMIT: usize = 100;
pub const MAX_ASSET_LIMIT: usize = 1000;

const MIN_CONTROLS_HIDE_SECS: f32 = 0.5;
const DEFAULT_CONTROLS_HIDE: Duration = Duration::from_secs(3);

/// Swipe thresholds. Distances are in points, velocities in points per
/// millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub slop: f32,
    pub distance_threshold: f32,
    pub velocity_threshold: f32,
    pub sidebar_width: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            slop: 10.0,
            distance_threshold: 50.0,
            velocity_threshold: 0.5,
            sidebar_width: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub media_dirs: Vec<PathBuf>,
    pub asset_limit: usize,
    /// Append the built-in sample items after the device items.
    pub include_samples: bool,
    pub controls_hide_secs: f32,
    pub gesture: GestureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let media_dirs = [dirs::video_dir(), dirs::audio_dir()]
            .into_iter()
            .flatten()
            .collect();

        Self {
            version: 1,
            media_dirs,
            asset_limit: MIN_ASSET_LIMIT,
            include_samples: true,
            controls_hide_secs: 3.0,
            gesture: GestureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Number of assets to request from the folder scan.
    pub fn effective_asset_limit(&self) -> usize {
        self.asset_limit.clamp(MIN_ASSET_LIMIT, MAX_ASSET_LIMIT)
    }

    /// Controls auto-hide delay. Values that are not a usable duration
    /// (NaN, infinite, overflowing) fall back to the default.
    pub fn controls_hide_after(&self) -> Duration {
        Duration::try_from_secs_f32(self.controls_hide_secs.max(MIN_CONTROLS_HIDE_SECS))
            .unwrap_or(DEFAULT_CONTROLS_HIDE)
    }

    pub fn add_media_dir(&mut self, dir: PathBuf) -> bool {
        if self.media_dirs.contains(&dir) {
            return false;
        }
        self.media_dirs.push(dir);
        true
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> AppConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::info!("No config at {}: {}, using defaults", path.display(), e);
            return AppConfig::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("Invalid config at {}: {}, using defaults", path.display(), e);
        AppConfig::default()
    })
}

pub fn save_config_to(cfg: &AppConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_limit_is_clamped() {
        let mut cfg = AppConfig::default();
        cfg.asset_limit = 5;
        assert_eq!(cfg.effective_asset_limit(), 100);
        cfg.asset_limit = 5000;
        assert_eq!(cfg.effective_asset_limit(), 1000);
        cfg.asset_limit = 250;
        assert_eq!(cfg.effective_asset_limit(), 250);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut cfg = AppConfig::default();
        cfg.media_dirs = vec![PathBuf::from("/media/clips")];
        cfg.include_samples = false;
        save_config_to(&cfg, &path).unwrap();

        assert_eq!(load_config_from(&path), cfg);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "asset_limit": 300 }"#).unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.asset_limit, 300);
        assert!(cfg.include_samples);
        assert_eq!(cfg.gesture, GestureConfig::default());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.controls_hide_secs, 3.0);
    }

    #[test]
    fn test_add_media_dir_skips_duplicates() {
        let mut cfg = AppConfig::default();
        cfg.media_dirs.clear();
        assert!(cfg.add_media_dir(PathBuf::from("/a")));
        assert!(!cfg.add_media_dir(PathBuf::from("/a")));
        assert_eq!(cfg.media_dirs.len(), 1);
    }

    #[test]
    fn test_controls_hide_after_rejects_unusable_values() {
        let mut cfg = AppConfig::default();
        assert_eq!(cfg.controls_hide_after(), Duration::from_secs(3));

        cfg.controls_hide_secs = 0.1;
        assert_eq!(cfg.controls_hide_after(), Duration::from_millis(500));

        cfg.controls_hide_secs = 1e30;
        assert_eq!(cfg.controls_hide_after(), Duration::from_secs(3));

        cfg.controls_hide_secs = f32::INFINITY;
        assert_eq!(cfg.controls_hide_after(), Duration::from_secs(3));

        cfg.controls_hide_secs = f32::NAN;
        assert_eq!(cfg.controls_hide_after(), Duration::from_millis(500));
    }
}
