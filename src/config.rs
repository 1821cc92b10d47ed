use crate::app_dirs::AppDirs;
use crate::gesture::EXTENSION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const COUNTDOWN_SECS: u64 = 3;
pub const ROUND_INTERVAL_SECS: u64 = 10;
pub const RESULT_DISPLAY_SECS: u64 = 3;
pub const FRAME_INTERVAL_MS: u64 = 33;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub extension_threshold: f32,
    pub countdown_secs: u64,
    pub round_interval_secs: u64,
    pub result_display_secs: u64,
    pub frame_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            extension_threshold: EXTENSION_THRESHOLD,
            countdown_secs: COUNTDOWN_SECS,
            round_interval_secs: ROUND_INTERVAL_SECS,
            result_display_secs: RESULT_DISPLAY_SECS,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

impl GameConfig {
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    pub fn round_interval(&self) -> Duration {
        Duration::from_secs(self.round_interval_secs)
    }

    pub fn result_display(&self) -> Duration {
        Duration::from_secs(self.result_display_secs)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("rochambeau.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {}", self.path.display(), e),
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_game_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.extension_threshold, 0.05);
        assert_eq!(cfg.countdown(), Duration::from_secs(3));
        assert_eq!(cfg.round_interval(), Duration::from_secs(10));
        assert_eq!(cfg.result_display(), Duration::from_secs(3));
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = GameConfig::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = GameConfig {
            extension_threshold: 0.08,
            countdown_secs: 5,
            round_interval_secs: 12,
            result_display_secs: 4,
            frame_interval_ms: 16,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), GameConfig::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), GameConfig::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"countdown_secs": 5}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.countdown_secs, 5);
        assert_eq!(cfg.round_interval_secs, ROUND_INTERVAL_SECS);
    }
}
