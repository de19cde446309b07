use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::{ParlanceError, Result};

/// Path of the config file when no `--config` flag is given.
pub const ENV_CONFIG: &str = "PARLANCE_CONFIG";

/// Environment variables that override the config file.
pub const ENV_API_KEY: &str = "PARLANCE_API_KEY";
pub const ENV_ENDPOINT: &str = "PARLANCE_ENDPOINT";
pub const ENV_VERSION_ID: &str = "PARLANCE_VERSION_ID";
pub const ENV_PORT: &str = "PARLANCE_PORT";

/// Top-level configuration for Parlance.
///
/// Loaded from `~/.parlance/config.toml` by default, then overridden from
/// the environment. The upstream section has no usable defaults: `serve`
/// calls [`ParlanceConfig::validate`] before binding and refuses to start
/// when a required setting is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParlanceConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

impl ParlanceConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParlanceConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration if the file exists, otherwise start from defaults.
    /// A file that exists but does not parse is still an error.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(
                "No config file at {}, using defaults and environment",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.upstream.api_key = ApiKey::new(key);
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.upstream.endpoint = endpoint;
        }
        if let Some(version) = get(ENV_VERSION_ID) {
            self.upstream.version_id = Some(version.parse()?);
        }
        if let Some(port) = get(ENV_PORT) {
            self.server.port = port.parse().map_err(|_| {
                ParlanceError::Config(format!("{ENV_PORT} is not a valid port: {port}"))
            })?;
        }
        Ok(())
    }

    /// Check every setting the relay needs before it serves traffic.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.upstream.api_key.is_empty() {
            problems.push(format!(
                "upstream.api_key must be a non-empty string (or set {ENV_API_KEY})"
            ));
        }
        if let Err(e) = self.upstream.endpoint_url() {
            problems.push(e.to_string());
        }
        if self.upstream.version_id.is_none() {
            problems.push(format!(
                "upstream.version_id must be one of {} (or set {ENV_VERSION_ID})",
                VersionId::NAMES.join(", ")
            ));
        }
        if self.upstream.timeout_secs == 0 {
            problems.push("upstream.timeout_secs must be greater than zero".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ParlanceError::Config(problems.join("; ")))
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings for the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body for `/api/prompt`.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Secret used as the upstream `Authorization` header.
///
/// Debug output is redacted so the key never reaches the logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// Deployment environment of the upstream dialogue project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionId {
    Development,
    Production,
}

impl VersionId {
    pub const NAMES: [&'static str; 2] = ["development", "production"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionId::Development => "development",
            VersionId::Production => "production",
        }
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionId {
    type Err = ParlanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "development" => Ok(VersionId::Development),
            "production" => Ok(VersionId::Production),
            other => Err(ParlanceError::Config(format!(
                "invalid version id '{}'. Must be one of: {}",
                other,
                VersionId::NAMES.join(", ")
            ))),
        }
    }
}

/// Upstream dialogue service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_key: ApiKey,
    /// Base URL; the interaction path is appended per session.
    pub endpoint: String,
    pub version_id: Option<VersionId>,
    /// Upper bound on one upstream interaction, connect included.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            endpoint: String::new(),
            version_id: None,
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    /// Parse `endpoint` as an absolute http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(self.endpoint.trim()).map_err(|e| {
            ParlanceError::Config(format!(
                "upstream.endpoint must be a valid URL (or set {ENV_ENDPOINT}): {e}"
            ))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ParlanceError::Config(format!(
                "upstream.endpoint must use http or https, got '{scheme}'"
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the terminal chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL of a running relay (`/api/prompt` is appended).
    pub relay_url: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:3030".to_string(),
        }
    }
}
