//! # Configuration
//!
//! Bounds of the style cache, idle scheduling delays and the stylesheet asset
//! locations, loadable from TOML or JSON and overridable through environment
//! variables.
//!
//! ## Configuration File Format
//!
//! ```toml
//! [cache]
//! capacity = 10
//! history_capacity = 10
//! stable_threshold = 2
//!
//! [idle]
//! fallback_delay_ms = 0
//! idle_timeout_ms = 500
//!
//! [stylesheet]
//! light_href = "/public/build/light.css"
//! dark_href = "/public/build/dark.css"
//! adopt_untagged = true
//! ```
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ## Environment Variables
//!
//! - `WARMSTYLE_CONFIG`: path to a `.toml` or `.json` configuration file
//! - `WARMSTYLE_CACHE_CAPACITY`: entries retained per style function
//! - `WARMSTYLE_LIGHT_HREF`: stylesheet of the light mode
//! - `WARMSTYLE_DARK_HREF`: stylesheet of the dark mode
//!
//! Variables override values read from the file.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::{StyleError, StyleResult};
use crate::usage::{DEFAULT_HISTORY_CAPACITY, DEFAULT_STABLE_THRESHOLD};

/// Complete configuration of the style cache and stylesheet swapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmConfig {
    /// Style cache bounds.
    pub cache: CacheConfig,
    /// Idle scheduling.
    pub idle: IdleConfig,
    /// Stylesheet assets.
    pub stylesheet: StylesheetConfig,
}

/// Bounds of the style cache and usage tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries retained per style function.
    pub capacity: usize,
    /// Argument tuples remembered per stable style function.
    pub history_capacity: usize,
    /// Calls after which a style function is warmed for other themes.
    pub stable_threshold: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            stable_threshold: DEFAULT_STABLE_THRESHOLD,
        }
    }
}

/// Idle scheduling delays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Delay of the timer fallback when no idle callback is available.
    pub fallback_delay_ms: u64,
    /// Upper bound handed to `requestIdleCallback`, if any.
    pub idle_timeout_ms: Option<u64>,
}

impl IdleConfig {
    /// The timer fallback delay.
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

/// Locations of the per-mode stylesheet assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Stylesheet href of the light mode.
    pub light_href: Option<String>,
    /// Stylesheet href of the dark mode.
    pub dark_href: Option<String>,
    /// Adopt untagged `<link>` elements whose href matches, e.g. the one
    /// emitted with the initial page.
    pub adopt_untagged: bool,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            light_href: None,
            dark_href: None,
            adopt_untagged: true,
        }
    }
}

impl StylesheetConfig {
    /// Set both stylesheet hrefs.
    pub fn with_hrefs(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.light_href = Some(light.into());
        self.dark_href = Some(dark.into());
        self
    }
}

impl WarmConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML content.
    pub fn from_toml(content: &str) -> StyleResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a configuration from JSON content.
    pub fn from_json(content: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> StyleResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StyleError::file_not_found(path));
        }
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(StyleError::UnsupportedConfigFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Build a configuration from the environment, falling back to defaults.
    ///
    /// A configuration file named by `WARMSTYLE_CONFIG` that fails to load is
    /// logged and ignored.
    pub fn from_env_or_default() -> Self {
        let mut config = match env::var("WARMSTYLE_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring configuration {}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Apply `WARMSTYLE_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(capacity) = lookup("WARMSTYLE_CACHE_CAPACITY") {
            match capacity.trim().parse() {
                Ok(capacity) => self.cache.capacity = capacity,
                Err(_) => log::warn!("Invalid WARMSTYLE_CACHE_CAPACITY: {}", capacity),
            }
        }
        if let Some(href) = lookup("WARMSTYLE_LIGHT_HREF") {
            self.stylesheet.light_href = Some(href);
        }
        if let Some(href) = lookup("WARMSTYLE_DARK_HREF") {
            self.stylesheet.dark_href = Some(href);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cache_bounds() {
        let config = WarmConfig::new();
        assert_eq!(config.cache.capacity, 10);
        assert_eq!(config.cache.history_capacity, 10);
        assert_eq!(config.cache.stable_threshold, 2);
        assert!(config.stylesheet.adopt_untagged);
        assert_eq!(config.idle.fallback_delay(), Duration::ZERO);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WarmConfig::from_toml(
            r#"
            [cache]
            capacity = 4

            [stylesheet]
            dark_href = "/build/dark.css"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.capacity, 4);
        assert_eq!(config.cache.stable_threshold, 2);
        assert_eq!(config.stylesheet.dark_href.as_deref(), Some("/build/dark.css"));
        assert_eq!(config.stylesheet.light_href, None);
    }

    #[test]
    fn test_json_config() {
        let config =
            WarmConfig::from_json(r#"{ "idle": { "idle_timeout_ms": 250 } }"#).unwrap();
        assert_eq!(config.idle.idle_timeout_ms, Some(250));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = WarmConfig::new();
        config.apply_overrides(|key| match key {
            "WARMSTYLE_CACHE_CAPACITY" => Some("3".to_string()),
            "WARMSTYLE_LIGHT_HREF" => Some("/light.css".to_string()),
            _ => None,
        });

        assert_eq!(config.cache.capacity, 3);
        assert_eq!(config.stylesheet.light_href.as_deref(), Some("/light.css"));
        assert_eq!(config.stylesheet.dark_href, None);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = env::temp_dir().join("warmstyle-config-test.yaml");
        fs::write(&path, "cache: {}").unwrap();
        let err = WarmConfig::from_file(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, StyleError::UnsupportedConfigFormat { .. }));
    }
}
