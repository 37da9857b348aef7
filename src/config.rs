use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::{validate_duration, SessionConfig, DEFAULT_SECS};
use crate::word_generator::DEFAULT_WORD_COUNT;

/// User preferences kept between runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub secs: u64,
    pub number_of_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secs: DEFAULT_SECS,
            number_of_words: DEFAULT_WORD_COUNT,
        }
    }
}

impl Config {
    /// Replaces values that a hand-edited file may have broken
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            secs: validate_duration(self.secs).unwrap_or(defaults.secs),
            number_of_words: if self.number_of_words == 0 {
                defaults.number_of_words
            } else {
                self.number_of_words
            },
        }
    }
}

impl From<Config> for SessionConfig {
    fn from(cfg: Config) -> Self {
        Self {
            number_of_words: cfg.number_of_words,
            secs: cfg.secs,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
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
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
