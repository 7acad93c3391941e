//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A destination was added to a channel that was never enabled
    #[error("Cannot add a destination to the {channel} channel: channel is not enabled")]
    ChannelDisabled { channel: &'static str },

    /// Capacity hint that does not exceed the current registry size
    #[error("Capacity hint {requested} must exceed the current registry size {current}")]
    CapacityHint { requested: usize, current: usize },

    /// Numeric value outside the closed set of levels
    #[error("Invalid log level value: {0}")]
    InvalidLevel(i8),

    /// Unknown level name
    #[error("Invalid log level: '{0}'")]
    ParseLevel(String),

    /// Write to a single destination failed
    #[error("Write to destination '{destination}' failed: {source}")]
    DestinationWrite {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// One or more destinations failed during a single dispatch
    #[error("{failed} of {attempted} destination writes failed (first: {first})")]
    Dispatch {
        failed: usize,
        attempted: usize,
        first: Box<LoggerError>,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Reading a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or configuration parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoggerError {
    pub fn channel_disabled(channel: &'static str) -> Self {
        LoggerError::ChannelDisabled { channel }
    }

    pub fn capacity_hint(requested: usize, current: usize) -> Self {
        LoggerError::CapacityHint { requested, current }
    }

    /// Create a destination write error
    pub fn destination_write(destination: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::DestinationWrite {
            destination: destination.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Fold per-destination failures into a single report.
    ///
    /// Returns `None` when nothing failed.
    pub fn from_failures(mut failures: Vec<LoggerError>, attempted: usize) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        let failed = failures.len();
        let first = failures.swap_remove(0);
        Some(LoggerError::Dispatch {
            failed,
            attempted,
            first: Box::new(first),
        })
    }
}
