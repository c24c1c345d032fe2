use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fmt, fs, time::Duration};
use url::Url;

// Runtime constants for the client (backend location and UI timings).

pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1_500;
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidValue { key: &'static str, value: String },
    InvalidBaseUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
            ConfigError::InvalidBaseUrl(url) => write!(f, "invalid backend url: {url}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub message_timeout_ms: u64,
    pub redirect_delay_ms: u64,
    pub password_min_length: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    // Session persistence; memory-only when unset.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Defaults, then `FINANCE_CONFIG_FILE` when set, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("FINANCE_CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.base_url()?;
        Ok(config)
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Applies `FINANCE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(protocol) = lookup("FINANCE_BACKEND_PROTOCOL") {
            self.backend.protocol = protocol.trim().to_string();
        }
        if let Some(host) = lookup("FINANCE_BACKEND_HOST") {
            self.backend.host = host.trim().to_string();
        }
        if let Some(port) = lookup("FINANCE_BACKEND_PORT") {
            self.backend.port = parse("FINANCE_BACKEND_PORT", &port)?;
        }
        if let Some(timeout) = lookup("FINANCE_REQUEST_TIMEOUT_MS") {
            self.backend.request_timeout_ms = parse("FINANCE_REQUEST_TIMEOUT_MS", &timeout)?;
        }
        if let Some(path) = lookup("FINANCE_SESSION_FILE") {
            self.session_file = Some(PathBuf::from(path.trim()));
        }
        Ok(())
    }

    /// `protocol://host:port`, without a trailing slash.
    pub fn base_url(&self) -> Result<String, ConfigError> {
        let raw = format!(
            "{}://{}:{}",
            self.backend.protocol, self.backend.host, self.backend.port
        );
        match Url::parse(&raw) {
            Ok(url) if url.has_host() => Ok(raw),
            _ => Err(ConfigError::InvalidBaseUrl(raw)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.message_timeout_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.ui.redirect_delay_ms)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
