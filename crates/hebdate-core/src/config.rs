//! Deployment configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults (Hebcal endpoint, 10 second timeout, 24 hour cache,
//!    host-local timezone).
//! 2. `config.toml` in the platform config directory (or `HEBDATE_CONFIG_DIR`).
//! 3. Environment variables: `HEBDATE_API_URL`, `HEBDATE_TIMEOUT_SECS`,
//!    `HEBDATE_TIMEZONE`, `HEBDATE_DATA_DIR`.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! base_url = "https://www.hebcal.com/converter"
//! timeout_secs = 10
//!
//! [cache]
//! ttl_hours = 24
//!
//! [clock]
//! timezone = "Asia/Jerusalem"
//! ```
//!
//! ```rust
//! use hebdate_core::Config;
//!
//! let config: Config = toml::from_str("[clock]\ntimezone = \"UTC\"").unwrap();
//! assert_eq!(config.clock.timezone.to_string(), "UTC");
//! assert_eq!(config.api.timeout_secs, 10);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::{Error, Result, Timezone};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Longest accepted cache lifetime: ten years.
pub const MAX_TTL_HOURS: u64 = 10 * 366 * 24;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Converter endpoint settings
    pub api: ApiConfig,
    /// Lookup cache settings
    pub cache: CacheConfig,
    /// How "today" is resolved
    pub clock: ClockConfig,
}

/// Converter endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `cfg`/`date`/`g2h` query is appended to.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Lookup cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a successful lookup, in hours.
    pub ttl_hours: u64,
    /// Directory for cache entries. Defaults to the platform cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            dir: None,
        }
    }
}

/// Clock settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Timezone the local calendar date is computed in.
    pub timezone: Timezone,
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        Self::load_in(None)
    }

    /// Like [`Config::load`], reading `config.toml` from `dir` when given.
    pub fn load_in(dir: Option<&Path>) -> Result<Self> {
        let path = match dir {
            Some(dir) => dir.join(CONFIG_FILE_NAME),
            None => Self::config_path()?,
        };
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit file without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply `HEBDATE_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("HEBDATE_API_URL") {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(secs) = var("HEBDATE_TIMEOUT_SECS") {
            self.api.timeout_secs = secs.trim().parse().map_err(|e| {
                Error::Config(format!("Invalid HEBDATE_TIMEOUT_SECS '{secs}': {e}"))
            })?;
        }
        if let Some(tz) = var("HEBDATE_TIMEZONE") {
            self.clock.timezone = tz.parse()?;
        }
        if let Some(dir) = var("HEBDATE_DATA_DIR") {
            self.cache.dir = Some(PathBuf::from(dir.trim()));
        }
        Ok(())
    }

    /// Reject settings the lookup cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {e}", self.api.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported URL scheme '{}' for base URL",
                url.scheme()
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".into()));
        }
        if self.cache.ttl_hours == 0 {
            return Err(Error::Config("ttl_hours must be at least 1".into()));
        }
        if self.cache.ttl_hours > MAX_TTL_HOURS {
            return Err(Error::Config(format!(
                "ttl_hours must be at most {MAX_TTL_HOURS}, got {}",
                self.cache.ttl_hours
            )));
        }
        Ok(())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Lifetime of cached lookups. Saturates rather than overflowing on
    /// unvalidated input.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        match self.cache.ttl_hours.checked_mul(60 * 60) {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::MAX,
        }
    }

    /// Directory the file-backed cache lives in.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache.dir {
            return Ok(dir.clone());
        }
        Ok(project_dirs()?.cache_dir().join("dates"))
    }

    /// Path of the configuration file, honoring `HEBDATE_CONFIG_DIR`.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("HEBDATE_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join(CONFIG_FILE_NAME));
            }
        }
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "hebdate", "hebdate")
        .ok_or_else(|| Error::Config("Failed to determine project directories".into()))
}
