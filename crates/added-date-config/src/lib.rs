pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigError, ConnectionOverrides, ConnectionSettings, DefaultsConfig, PlexConfig, DEFAULT_LIBRARY,
    DEFAULT_SERVER_URL, SERVER_URL_ENV, TOKEN_ENV,
};
pub use paths::{PathManager, CONFIG_DIR_ENV};
