//! Configuration file parser for ~/.config/headlines/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Env var that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "GUARDIAN_API_KEY";

/// Rate-limited public developer key accepted by the content API.
const DEFAULT_API_KEY: &str = "test";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid base_url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`. Only the query values are
/// configurable; the request shape itself is fixed.
///
/// Custom Debug impl masks `api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search endpoint of the content API.
    pub base_url: String,

    /// Search term (`q`).
    pub topic: String,

    /// Comma-joined category filters (`tag`).
    pub tags: String,

    /// ISO date lower bound (`from-date`).
    pub from_date: String,

    /// Tag types to embed in each result (`show-tags`); `contributor` supplies authors.
    pub show_tags: String,

    /// Result ordering (`order-by`).
    pub order_by: String,

    /// API credential (`api-key`). `GUARDIAN_API_KEY` takes precedence.
    pub api_key: Option<String>,

    pub connect_timeout_secs: u64,

    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://content.guardianapis.com/search".to_string(),
            topic: "technology".to_string(),
            tags: "technology/apple,technology/technology,business/business".to_string(),
            from_date: "2018-01-01".to_string(),
            show_tags: "contributor".to_string(),
            order_by: "relevance".to_string(),
            api_key: None,
            connect_timeout_secs: 15,
            read_timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("topic", &self.topic)
            .field("tags", &self.tags)
            .field("from_date", &self.from_date)
            .field("show_tags", &self.show_tags)
            .field("order_by", &self.order_by)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 9] = [
        "base_url",
        "topic",
        "tags",
        "from_date",
        "show_tags",
        "order_by",
        "api_key",
        "connect_timeout_secs",
        "read_timeout_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), topic = %config.topic, "Loaded configuration");
        Ok(config)
    }

    /// Resolves the API key: `GUARDIAN_API_KEY`, then `api_key`, then the
    /// public developer key `test`.
    pub fn api_key(&self) -> SecretString {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::trace!("Using API key from environment");
                return SecretString::from(key);
            }
        }
        match &self.api_key {
            Some(key) => SecretString::from(key.clone()),
            None => SecretString::from(DEFAULT_API_KEY),
        }
    }

    /// Builds the search request URL with every query parameter filled in.
    pub fn request_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("q", &self.topic)
            .append_pair("format", "json")
            .append_pair("tag", &self.tags)
            .append_pair("from-date", &self.from_date)
            .append_pair("show-tags", &self.show_tags)
            .append_pair("order-by", &self.order_by)
            .append_pair("api-key", self.api_key().expose_secret());
        Ok(url)
    }

    /// Host and port the connectivity check should probe.
    pub fn api_endpoint(&self) -> Option<(String, u16)> {
        let url = Url::parse(&self.base_url).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some((host, port))
    }
}

// ============================================================================
// Tests
// ============================================================================
