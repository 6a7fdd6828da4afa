use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;
use url::Url;

/// Origin of the hosted CareBridge backend.
pub const DEFAULT_API_BASE_URL: &str = "https://carebridge-backend-fys5.onrender.com";

/// Query parameter that carries a freshly issued credential on magic links.
pub const DEFAULT_LINK_PARAMETER: &str = "token";

const ENV_API_BASE_URL: &str = "CAREBRIDGE_API_BASE_URL";
const ENV_LOG_LEVEL: &str = "CAREBRIDGE_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "CAREBRIDGE_LOG_FORMAT";
const ENV_TOKEN_PATH: &str = "CAREBRIDGE_TOKEN_PATH";

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(not(target_arch = "wasm32"))]
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported configuration format for {0}; use .yaml, .yml or .json")]
    UnsupportedFormat(PathBuf),
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other}")),
        }
    }
}

/// Client configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin every API path is resolved against
    pub api_base_url: Url,

    /// Logging level
    pub log_level: String,

    /// Log line format
    pub log_format: LogFormat,

    /// Where a native client stores its credential; `None` picks the
    /// per-user configuration directory.
    pub token_path: Option<PathBuf>,

    /// Query parameter carrying a credential on incoming links
    pub link_parameter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never in practice: the default origin is a compile-time constant that
    /// always parses.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default API origin is a valid URL")),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            token_path: None,
            link_parameter: DEFAULT_LINK_PARAMETER.to_string(),
        }
    }

    /// Loads the configuration from defaults, an optional file, environment
    /// variables, and finally an explicit API origin override, in that order.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or a value is
    /// invalid.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<PathBuf>,
        api_base_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides()?;

        if let Some(url) = api_base_override {
            config.api_base_url = url;
        }

        config.validate()?;
        tracing::debug!(api_base_url = %config.api_base_url, "resolved client configuration");
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::UnsupportedFormat(path)),
        }
    }

    /// Overlay `CAREBRIDGE_*` environment variables onto this configuration.
    ///
    /// # Errors
    /// Returns an error when a variable holds an unparsable value.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = env::var(ENV_API_BASE_URL) {
            self.api_base_url = Url::parse(&raw).map_err(|err| ConfigError::InvalidValue {
                key: ENV_API_BASE_URL,
                value: raw.clone(),
                reason: err.to_string(),
            })?;
        }
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Ok(raw) = env::var(ENV_LOG_FORMAT) {
            self.log_format = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_LOG_FORMAT,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Ok(path) = env::var(ENV_TOKEN_PATH) {
            self.token_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns an error when the API origin cannot carry HTTP requests or the
    /// link parameter is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.api_base_url.scheme(), "http" | "https")
            || self.api_base_url.cannot_be_a_base()
        {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url",
                value: self.api_base_url.to_string(),
                reason: "must be an http or https origin".to_string(),
            });
        }
        if self.link_parameter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "link_parameter",
                value: self.link_parameter.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
