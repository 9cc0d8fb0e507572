use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use url::Url;

/// Local development API used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variables consulted for the API base URL, in priority order.
pub const API_BASE_URL_VARS: [&str; 3] = [
    "DASHBOARD_API_BASE_URL",
    "DASHBOARD_API_BASE_URL_DEPLOY",
    "DASHBOARD_API_URL",
];

const LOG_LEVEL_VAR: &str = "DASHBOARD_LOG_LEVEL";
const TOKEN_PATH_VAR: &str = "DASHBOARD_TOKEN_PATH";

/// Errors raised while loading or validating [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access configuration file {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file extension or requested format is not one we understand.
    #[error("unsupported configuration format '{0}'. Use 'yaml', 'json' or 'toml'.")]
    UnsupportedFormat(String),
    /// YAML parse or render failure.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// JSON parse or render failure.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML parse failure.
    #[error("invalid TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML render failure.
    #[error("failed to render TOML configuration: {0}")]
    TomlRender(#[from] toml::ser::Error),
    /// The API base URL is malformed or not http(s).
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A zero-second request timeout was configured.
    #[error("invalid request timeout. Must be greater than 0 seconds.")]
    InvalidTimeout,
}

/// Serialization formats accepted for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Infers the format from a file extension.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedFormat`] for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    /// Default file name used when generating a config in this format.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Yaml => "dashboard.yaml",
            Self::Json => "dashboard.json",
            Self::Toml => "dashboard.toml",
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Resolved configuration for the dashboard client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto, e.g. `https://host/api`.
    pub api_base_url: String,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Tracing output format.
    pub log_format: LogFormat,

    /// Where the session token is persisted; platform config dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    /// Per-request timeout. Unset keeps the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// The base URL honours values baked in at build time before falling back
    /// to the local development server.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: build_time_api_base_url()
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            token_path: None,
            request_timeout_secs: None,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a YAML, JSON or TOML file.
    /// * `api_url_override` - Optional base URL that beats every other source.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, or when the
    /// resolved values fail validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        api_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::with_defaults(),
        };

        config.apply_env_overrides_with(|name| env::var(name).ok());

        if let Some(url) = api_url_override {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration file; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or its contents are invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_as(&content, format)
    }

    /// Parses configuration text in the given format.
    ///
    /// # Errors
    /// Returns the format-specific parse error.
    pub fn from_str_as(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config = match format {
            ConfigFormat::Yaml => serde_yml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Renders this configuration in the given format.
    ///
    /// # Errors
    /// Returns the format-specific serialization error.
    pub fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let rendered = match format {
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(rendered)
    }

    /// Applies environment overrides to values still at their defaults.
    ///
    /// `lookup` stands in for `std::env::var` so callers can supply any source.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_defaults();

        if self.api_base_url == defaults.api_base_url {
            if let Some(url) = resolve_api_base_url(&lookup) {
                self.api_base_url = url;
            }
        }
        if self.log_level == defaults.log_level {
            if let Some(level) = non_empty(lookup(LOG_LEVEL_VAR)) {
                self.log_level = level;
            }
        }
        if self.token_path.is_none() {
            if let Some(path) = non_empty(lookup(TOKEN_PATH_VAR)) {
                self.token_path = Some(PathBuf::from(path));
            }
        }
    }

    /// Validates the resolved configuration.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// The API base URL, normalised to end with `/` so relative joins append.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] for unparsable or non-http(s) URLs.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.trim();
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let mut url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Token file location, falling back to the platform config directory.
    #[must_use]
    pub fn resolved_token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(default_token_path)
    }
}

/// First non-empty API base URL among [`API_BASE_URL_VARS`].
pub fn resolve_api_base_url<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_BASE_URL_VARS
        .into_iter()
        .find_map(|name| non_empty(lookup(name)))
}

/// `<config_dir>/admin-dashboard/auth-token`, or `./auth-token` without a home.
#[must_use]
pub fn default_token_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("admin-dashboard").join("auth-token"))
        .unwrap_or_else(|| PathBuf::from("./auth-token"))
}

fn build_time_api_base_url() -> Option<&'static str> {
    [
        option_env!("DASHBOARD_API_BASE_URL"),
        option_env!("DASHBOARD_API_BASE_URL_DEPLOY"),
        option_env!("DASHBOARD_API_URL"),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
