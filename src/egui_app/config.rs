use std::path::{Path, PathBuf};

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, FileConfig};

/// Environment variable overriding the backend URL
pub const API_URL_ENV: &str = "WACHAT_API_URL";
/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "WACHAT_CONFIG";

const SESSION_FILE_NAME: &str = "session.json";
const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR: &str = "wachat";

/// Application configuration wrapper.
///
/// Resolution order: builder defaults (session file under
/// `<config dir>/wachat/`), then the TOML file (from `WACHAT_CONFIG` or
/// `<config dir>/wachat/config.toml` when it exists), then `WACHAT_API_URL`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Load from the environment and the optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();

        if let Some(dir) = dirs::config_dir() {
            builder = builder.session_path(dir.join(APP_DIR).join(SESSION_FILE_NAME));
        }

        if let Some(path) = config_file_path() {
            if path.exists() {
                tracing::info!("Loading configuration from {}", path.display());
                builder = builder.apply_file(read_file(&path)?);
            }
        }

        if let Ok(url) = std::env::var(API_URL_ENV) {
            builder = builder.server_url(url);
        }

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn session_path(&self) -> Option<&Path> {
        self.app.session_path.as_deref()
    }
}

impl From<AppConfig> for Config {
    fn from(app: AppConfig) -> Self {
        Self { app }
    }
}

fn config_file_path() -> Option<PathBuf> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME)),
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    FileConfig::from_toml_str(&source)
}
