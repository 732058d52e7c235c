use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:32400";
pub const DEFAULT_LIBRARY: &str = "Movies";
pub const TOKEN_ENV: &str = "PLEX_TOKEN";
pub const SERVER_URL_ENV: &str = "PLEX_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No Plex token provided. Set PLEX_TOKEN env var or use --token.")]
    MissingToken,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Optional on-disk configuration (`config.toml`)
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plex: PlexConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlexConfig {
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub library: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load the config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// `--library` → `[defaults].library` → `Movies`
    pub fn library_name(&self, flag: Option<String>) -> String {
        first_non_empty([flag, self.defaults.library.clone()])
            .unwrap_or_else(|| DEFAULT_LIBRARY.to_string())
    }
}

/// Connection settings resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub server_url: String,
    pub token: String,
    pub timeout: Duration,
}

/// Values given on the command line, before any fallback
#[derive(Debug, Default, Clone)]
pub struct ConnectionOverrides {
    pub server_url: Option<String>,
    pub token: Option<String>,
}

impl ConnectionSettings {
    /// Resolve flag → environment → config file → default.
    ///
    /// `env` is the environment lookup, injected so callers decide where variables come from.
    pub fn resolve<F>(overrides: ConnectionOverrides, env: F, config: &Config) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = first_non_empty([
            overrides.server_url,
            env(SERVER_URL_ENV),
            config.plex.server_url.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let token = first_non_empty([overrides.token, env(TOKEN_ENV), config.plex.token.clone()])
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(config.plex.timeout_secs),
        })
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
