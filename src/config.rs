//! Configuration file parser for ~/.config/blogfeed/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::controller::deeplink::DeepLinkMode;
use crate::controller::FeedSettings;
use crate::util::{validate_endpoint, UrlValidationError};

/// Endpoint serving the article list when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://bblog-psi.vercel.app/api/articles";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address of the JSON article list.
    pub endpoint: String,

    /// Bound on the whole fetch, in seconds.
    pub timeout_secs: u64,

    /// Articles per page in list mode.
    pub per_page: usize,

    /// Articles shown by the home page preview.
    pub preview_count: usize,

    /// Excerpt length, in characters, for articles without a summary.
    pub excerpt_chars: usize,

    /// How a `?slug=` deep link is presented: "expand" or "single".
    pub deep_link: DeepLinkMode,

    /// Height of the fixed page header, in pixels.
    pub header_offset: u32,

    /// Public site root used to build absolute article links. Relative
    /// `blog.html?slug=` links are used when unset.
    pub site_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            per_page: 12,
            preview_count: 3,
            excerpt_chars: 200,
            deep_link: DeepLinkMode::Expand,
            header_offset: 80,
            site_url: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "endpoint",
        "timeout_secs",
        "per_page",
        "preview_count",
        "excerpt_chars",
        "deep_link",
        "header_offset",
        "site_url",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
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
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            endpoint = %config.endpoint,
            per_page = config.per_page,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::Invalid {
                key: "per_page",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.preview_count == 0 {
            return Err(ConfigError::Invalid {
                key: "preview_count",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        self.endpoint_url()?;
        self.site()?;
        Ok(())
    }

    /// The article endpoint as a validated http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        validate_endpoint(&self.endpoint).map_err(|e| invalid_url("endpoint", e))
    }

    /// The configured site root, if any.
    pub fn site(&self) -> Result<Option<Url>, ConfigError> {
        self.site_url
            .as_deref()
            .map(|s| validate_endpoint(s).map_err(|e| invalid_url("site_url", e)))
            .transpose()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn preview_count(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.preview_count).unwrap_or(NonZeroUsize::MIN)
    }

    /// Presentation settings for the feed controller.
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            page_size: NonZeroUsize::new(self.per_page).unwrap_or(NonZeroUsize::MIN),
            excerpt_chars: self.excerpt_chars,
            deep_link_mode: self.deep_link,
            header_offset: self.header_offset,
        }
    }
}

fn invalid_url(key: &'static str, e: UrlValidationError) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: e.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
