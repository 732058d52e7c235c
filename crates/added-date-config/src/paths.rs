use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "PLEXDATE_CONFIG_DIR";

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("plexdate");

        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Honour `PLEXDATE_CONFIG_DIR`, else the platform config directory
    /// (e.g. `~/.config/plexdate` on Linux)
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Ok(Self::with_config_dir(PathBuf::from(dir))),
            _ => Self::new(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
