//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width every level name is padded to in framed text output
pub const PADDED_NAME_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Canonical name, right-padded with spaces to five columns when `pad` is set
    pub fn name(&self, pad: bool) -> String {
        pad_name(self.to_str(), pad)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::ParseLevel(s.to_string())),
        }
    }
}

impl TryFrom<i8> for LogLevel {
    type Error = LoggerError;

    fn try_from(value: i8) -> Result<Self, LoggerError> {
        match value {
            0 => Ok(LogLevel::Debug),
            1 => Ok(LogLevel::Info),
            2 => Ok(LogLevel::Warn),
            3 => Ok(LogLevel::Error),
            4 => Ok(LogLevel::Fatal),
            other => Err(LoggerError::InvalidLevel(other)),
        }
    }
}

/// Threshold assigned to a scope.
///
/// `Inherit` defers to the nearest preceding scope that carries an explicit
/// level. It is deliberately not a `LogLevel` variant, so it can never be
/// compared against the severity of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Threshold {
    #[default]
    Inherit,
    Level(LogLevel),
}

impl Threshold {
    pub const INHERIT_NAME: &'static str = "INHERIT";

    /// The explicit level, or `None` for `Inherit`
    #[inline]
    pub fn level(&self) -> Option<LogLevel> {
        match self {
            Threshold::Inherit => None,
            Threshold::Level(level) => Some(*level),
        }
    }

    #[inline]
    pub fn is_inherit(&self) -> bool {
        matches!(self, Threshold::Inherit)
    }

    pub fn name(&self, pad: bool) -> String {
        match self {
            Threshold::Inherit => pad_name(Self::INHERIT_NAME, pad),
            Threshold::Level(level) => level.name(pad),
        }
    }
}

impl From<LogLevel> for Threshold {
    fn from(level: LogLevel) -> Self {
        Threshold::Level(level)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name(false))
    }
}

impl FromStr for Threshold {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::INHERIT_NAME) {
            return Ok(Threshold::Inherit);
        }
        s.parse::<LogLevel>().map(Threshold::Level)
    }
}

/// `-1` is the numeric encoding of `Inherit`
impl TryFrom<i8> for Threshold {
    type Error = LoggerError;

    fn try_from(value: i8) -> Result<Self, LoggerError> {
        match value {
            -1 => Ok(Threshold::Inherit),
            other => LogLevel::try_from(other).map(Threshold::Level),
        }
    }
}

fn pad_name(name: &str, pad: bool) -> String {
    if pad {
        format!("{:<width$}", name, width = PADDED_NAME_WIDTH)
    } else {
        name.to_string()
    }
}
