//! Logging context configuration
//!
//! Holds the knobs that the original build-time switches controlled: the
//! default threshold for debug and release builds, how extras are laid out
//! in text output, and how structured output treats quote characters.

use super::error::Result;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placement of extras in text output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrasLayout {
    /// `Hello EXTRAS a ; b ;`
    #[default]
    SameLine,

    /// Each extra on its own continuation line, aligned under the message
    SeparateLines,
}

/// Quote handling for structured output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonEscaping {
    /// Replace every `"` with `'` before serialization
    #[default]
    Apostrophe,

    /// Keep quotes and let the serializer escape them
    Full,
}

/// Where level resolution starts walking the scope registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Start at the most recently created live scope, whichever scope is queried
    #[default]
    RegistryTail,

    /// Start at the queried scope's own position
    OwnPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default threshold when built with debug assertions
    pub debug_default_level: LogLevel,

    /// Default threshold for optimized builds
    pub release_default_level: LogLevel,

    /// Takes precedence over both build-dependent defaults when set
    pub default_level_override: Option<LogLevel>,

    pub extras_layout: ExtrasLayout,
    pub json_escaping: JsonEscaping,
    pub resolution_mode: ResolutionMode,

    /// Colour the bracketed level name in text output (requires the `console` feature)
    pub colorize_levels: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug_default_level: LogLevel::Info,
            release_default_level: LogLevel::Warn,
            default_level_override: None,
            extras_layout: ExtrasLayout::default(),
            json_escaping: JsonEscaping::default(),
            resolution_mode: ResolutionMode::default(),
            colorize_levels: false,
        }
    }
}

impl LoggerConfig {
    /// Threshold used when no scope carries an explicit level
    #[must_use]
    pub fn default_level(&self) -> LogLevel {
        if let Some(level) = self.default_level_override {
            return level;
        }
        if cfg!(debug_assertions) {
            self.debug_default_level
        } else {
            self.release_default_level
        }
    }

    /// Parse a configuration from JSON; missing fields keep their defaults
    ///
    /// # Example
    ///
    /// ```
    /// use scoped_logger::{ExtrasLayout, LoggerConfig};
    ///
    /// let config = LoggerConfig::from_json_str(r#"{"extras_layout": "separate_lines"}"#).unwrap();
    /// assert_eq!(config.extras_layout, ExtrasLayout::SeparateLines);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        #[cfg(not(feature = "console"))]
        if self.colorize_levels {
            return Err(super::error::LoggerError::config(
                "colorize_levels",
                "level colouring requires the `console` feature",
            ));
        }
        Ok(())
    }
}
