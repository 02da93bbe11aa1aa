use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::game::GameConfig;

/// Persisted settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_points: u32,
    pub node_lifetime_secs: f64,
    pub auto_play_interval_ms: u64,
    pub countdown_interval_ms: u64,
    pub elapsed_interval_ms: u64,
    pub node_size: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_points: 5,
            node_lifetime_secs: 3.0,
            auto_play_interval_ms: 1000,
            countdown_interval_ms: 100,
            elapsed_interval_ms: 100,
            node_size: 50.0,
        }
    }
}

impl From<&Config> for GameConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            default_points: cfg.default_points,
            node_lifetime_secs: cfg.node_lifetime_secs,
            node_size: cfg.node_size,
            elapsed_interval: Duration::from_millis(cfg.elapsed_interval_ms),
            countdown_interval: Duration::from_millis(cfg.countdown_interval_ms),
            auto_play_interval: Duration::from_millis(cfg.auto_play_interval_ms),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "klear") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("klear_config.json")
        };
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
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
