//! Optional `crashboard.ron` configuration file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crashboard_engine::ClientSettings;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CONFIG_FILENAME: &str = "crashboard.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogSetting {
    File,
    Terminal,
    Both,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub query_timeout_secs: Option<u64>,
    pub log: LogSetting,
    pub log_file: PathBuf,
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout_secs: 10,
            query_timeout_secs: None,
            log: LogSetting::File,
            log_file: PathBuf::from("./crashboard.log"),
            color: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid base url {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0:?} must use http or https")]
    UnsupportedScheme(String),
}

/// Loads the config file. An explicit path must exist; the default one may not.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(AppConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

impl AppConfig {
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }

        Ok(ClientSettings {
            base_url,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            query_timeout: self.query_timeout_secs.map(Duration::from_secs),
        })
    }
}
