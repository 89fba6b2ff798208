//! Application configuration module
//!
//! Provides the configuration shared by the sync engine, the inbox watcher and
//! the desktop app: backend URL, timer cadences and the session file location.
//!
//! Values come from the builder defaults, optionally overlaid by a TOML file
//! (see [`FileConfig`]).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default backend address (a local json-server)
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_INBOX_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_DELIVERED_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_INLINE_ERROR_DURATION: Duration = Duration::from_secs(5);
const DEFAULT_SNACKBAR_DURATION: Duration = Duration::from_secs(3);
const DEFAULT_SENDER_PARAM: &str = "senderId";
const DEFAULT_RECIPIENT_PARAM: &str = "recipientId";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL, without trailing slash
    pub server_url: String,
    /// Conversation poll cadence
    pub poll_interval: Duration,
    /// Inbox watcher cadence
    pub inbox_interval: Duration,
    /// Delay before a sent message is shown as delivered
    pub delivered_delay: Duration,
    /// How long the inline send error stays visible
    pub inline_error_duration: Duration,
    /// How long a snackbar notice stays visible
    pub snackbar_duration: Duration,
    /// Session file; `None` keeps the session in memory only
    pub session_path: Option<PathBuf>,
    /// Query parameter filtering `/messages` by sender
    pub sender_param: String,
    /// Query parameter filtering `/messages` by recipient. Backends holding
    /// older data may need `toUserId` or `receiverId`.
    pub recipient_param: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            inbox_interval: DEFAULT_INBOX_INTERVAL,
            delivered_delay: DEFAULT_DELIVERED_DELAY,
            inline_error_duration: DEFAULT_INLINE_ERROR_DURATION,
            snackbar_duration: DEFAULT_SNACKBAR_DURATION,
            session_path: None,
            sender_param: DEFAULT_SENDER_PARAM.to_string(),
            recipient_param: DEFAULT_RECIPIENT_PARAM.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingValue("server_url"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        for (name, value) in [
            ("poll_interval", self.poll_interval),
            ("inbox_interval", self.inbox_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroInterval(name));
            }
        }
        for (name, value) in [
            ("sender_param", &self.sender_param),
            ("recipient_param", &self.recipient_param),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingValue(name));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    poll_interval: Option<Duration>,
    inbox_interval: Option<Duration>,
    delivered_delay: Option<Duration>,
    inline_error_duration: Option<Duration>,
    snackbar_duration: Option<Duration>,
    session_path: Option<PathBuf>,
    sender_param: Option<String>,
    recipient_param: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn inbox_interval(mut self, interval: Duration) -> Self {
        self.inbox_interval = Some(interval);
        self
    }

    pub fn delivered_delay(mut self, delay: Duration) -> Self {
        self.delivered_delay = Some(delay);
        self
    }

    pub fn inline_error_duration(mut self, duration: Duration) -> Self {
        self.inline_error_duration = Some(duration);
        self
    }

    pub fn snackbar_duration(mut self, duration: Duration) -> Self {
        self.snackbar_duration = Some(duration);
        self
    }

    pub fn session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Query parameter names used to filter messages by sender and recipient
    pub fn message_params(
        mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        self.sender_param = Some(sender.into());
        self.recipient_param = Some(recipient.into());
        self
    }

    /// Overlay every value present in a parsed config file
    pub fn apply_file(mut self, file: FileConfig) -> Self {
        if let Some(url) = file.server_url {
            self.server_url = Some(url);
        }
        let ms = Duration::from_millis;
        if let Some(v) = file.poll_interval_ms {
            self.poll_interval = Some(ms(v));
        }
        if let Some(v) = file.inbox_interval_ms {
            self.inbox_interval = Some(ms(v));
        }
        if let Some(v) = file.delivered_delay_ms {
            self.delivered_delay = Some(ms(v));
        }
        if let Some(v) = file.inline_error_ms {
            self.inline_error_duration = Some(ms(v));
        }
        if let Some(v) = file.snackbar_ms {
            self.snackbar_duration = Some(ms(v));
        }
        if let Some(path) = file.session_path {
            self.session_path = Some(path);
        }
        if let Some(name) = file.sender_param {
            self.sender_param = Some(name);
        }
        if let Some(name) = file.recipient_param {
            self.recipient_param = Some(name);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            inbox_interval: self.inbox_interval.unwrap_or(defaults.inbox_interval),
            delivered_delay: self.delivered_delay.unwrap_or(defaults.delivered_delay),
            inline_error_duration: self
                .inline_error_duration
                .unwrap_or(defaults.inline_error_duration),
            snackbar_duration: self.snackbar_duration.unwrap_or(defaults.snackbar_duration),
            session_path: self.session_path,
            sender_param: self.sender_param.unwrap_or(defaults.sender_param),
            recipient_param: self.recipient_param.unwrap_or(defaults.recipient_param),
        };
        config.validate()?;
        Ok(config)
    }
}

/// On-disk configuration, every key optional
///
/// ```toml
/// server_url = "http://localhost:3001"
/// poll_interval_ms = 2000
/// recipient_param = "receiverId"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub inbox_interval_ms: Option<u64>,
    pub delivered_delay_ms: Option<u64>,
    pub inline_error_ms: Option<u64>,
    pub snackbar_ms: Option<u64>,
    pub session_path: Option<PathBuf>,
    pub sender_param: Option<String>,
    pub recipient_param: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("invalid config file: {0}")]
    Parse(String),
    #[error("cannot read config file {path}: {message}")]
    Io { path: PathBuf, message: String },
}
