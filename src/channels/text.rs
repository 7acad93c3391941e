//! Human-readable text channel
//!
//! Frames every accepted record as a single line:
//!
//! ```text
//! [INFO ] 2025-01-08T10:30:45Z - src/main.rs (line 10) - Hello EXTRAS user=42 ;
//! ```

use super::destination::Destination;
use super::pending::{write_pending, PendingWrite};
use crate::core::{format_timestamp, ExtrasLayout, LogLevel, LogRecord, LoggerError, Result};
use std::sync::Arc;

const EXTRAS_MARKER: &str = "EXTRAS";

#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    layout: ExtrasLayout,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    colorize: bool,
}

impl TextFormatter {
    pub fn new(layout: ExtrasLayout) -> Self {
        Self {
            layout,
            colorize: false,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn layout(&self) -> ExtrasLayout {
        self.layout
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let mut head = String::with_capacity(32);
        if record.show_timestamp {
            head.push_str(&format_timestamp(&record.timestamp));
            head.push_str(" - ");
        }
        if let Some(file) = record.location.file() {
            head.push_str(file);
            head.push(' ');
        }
        if let Some(line) = record.location.line {
            head.push_str(&format!("(line {}) ", line));
        }
        if !record.location.is_empty() {
            head.push_str("- ");
        }

        // "[" + five-column name + "] "
        let message_column = 3 + record.level.name(true).len() + head.chars().count();

        let mut output = format!("[{}] {}{}", self.level_name(record.level), head, record.message);

        if !record.extras.is_empty() {
            output.push(' ');
            output.push_str(EXTRAS_MARKER);
            match self.layout {
                ExtrasLayout::SameLine => {
                    for extra in &record.extras {
                        output.push(' ');
                        output.push_str(extra);
                        output.push_str(" ;");
                    }
                }
                ExtrasLayout::SeparateLines => {
                    let indent = " ".repeat(message_column);
                    for extra in &record.extras {
                        output.push('\n');
                        output.push_str(&indent);
                        output.push_str(extra);
                        output.push_str(" ;");
                    }
                }
            }
        }

        output.push('\n');
        output
    }

    #[cfg(feature = "console")]
    fn level_name(&self, level: LogLevel) -> String {
        use colored::Colorize;
        if self.colorize {
            level.name(true).color(level.color_code()).to_string()
        } else {
            level.name(true)
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_name(&self, level: LogLevel) -> String {
        level.name(true)
    }
}

/// Text destinations and their enabled flag
#[derive(Debug, Default)]
pub struct TextChannel {
    enabled: bool,
    destinations: Vec<Destination>,
}

impl TextChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the channel and register `destination`
    pub fn enable(&mut self, destination: Destination) {
        self.enabled = true;
        self.destinations.push(destination);
    }

    /// Register another destination on an enabled channel
    pub fn add(&mut self, destination: Destination) -> Result<()> {
        if !self.enabled {
            return Err(LoggerError::channel_disabled("text"));
        }
        self.destinations.push(destination);
        Ok(())
    }

    /// Forget every destination; nothing is written or flushed
    pub fn disable(&mut self) {
        self.destinations.clear();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Render `record` once and bind it to every destination.
    ///
    /// Nothing is written yet; see [`PendingWrite`].
    pub fn prepare(&self, formatter: &TextFormatter, record: &LogRecord) -> Vec<PendingWrite> {
        if !self.enabled || self.destinations.is_empty() {
            return Vec::new();
        }

        let line: Arc<str> = formatter.format(record).into();
        self.destinations
            .iter()
            .map(|destination| PendingWrite::plain(destination.clone(), Arc::clone(&line)))
            .collect()
    }

    /// Render and write `record` to every destination.
    ///
    /// Failures are pushed to `failures`; the remaining destinations are
    /// still written. Returns the number of writes attempted.
    pub fn dispatch(
        &self,
        formatter: &TextFormatter,
        record: &LogRecord,
        failures: &mut Vec<LoggerError>,
    ) -> usize {
        write_pending(self.prepare(formatter, record), failures)
    }
}
