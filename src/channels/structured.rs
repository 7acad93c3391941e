//! Structured (JSON array) channel
//!
//! Each registered destination receives one JSON array over its lifetime in
//! the channel: `[` on registration, one object per accepted record separated
//! by `,`, and `]` when the channel is disabled. The content is only a valid
//! document once the closing bracket has been written.

use super::destination::Destination;
use super::pending::{write_pending, PendingWrite};
use crate::core::{format_timestamp, JsonEscaping, LogRecord, LoggerError, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const ARRAY_START: &str = "[";
const ARRAY_END: &str = "]";
const SEPARATOR: &str = ",";

#[derive(Debug, Serialize)]
struct StructuredEvent<'a> {
    severity: &'static str,
    message: Cow<'a, str>,
    timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extras: Vec<Cow<'a, str>>,
}

#[derive(Debug, Clone, Default)]
pub struct StructuredFormatter {
    escaping: JsonEscaping,
}

impl StructuredFormatter {
    pub fn new(escaping: JsonEscaping) -> Self {
        Self { escaping }
    }

    pub fn escaping(&self) -> JsonEscaping {
        self.escaping
    }

    /// Render `record` as a single JSON object
    pub fn format(&self, record: &LogRecord) -> Result<String> {
        let event = StructuredEvent {
            severity: record.level.to_str(),
            message: self.sanitize(&record.message),
            timestamp: format_timestamp(&record.timestamp),
            extras: record.extras.iter().map(|extra| self.sanitize(extra)).collect(),
        };
        Ok(serde_json::to_string(&event)?)
    }

    fn sanitize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.escaping {
            JsonEscaping::Apostrophe if text.contains('"') => Cow::Owned(text.replace('"', "'")),
            _ => Cow::Borrowed(text),
        }
    }
}

/// Per-destination array state.
///
/// Both flags only change while the destination's writer is locked, so the
/// separator and closing bracket land in the right place even when several
/// threads write to the same array.
#[derive(Debug, Default)]
pub(crate) struct ArrayCursor {
    started: AtomicBool,
    closed: AtomicBool,
}

impl ArrayCursor {
    /// Write one object, preceded by a separator unless it is the first.
    /// Elements arriving after the array was closed are dropped.
    pub(crate) fn write_element(&self, destination: &Destination, object: &str) -> Result<()> {
        destination.write_with(|writer| {
            if self.closed.load(Ordering::Relaxed) {
                return Ok(());
            }
            if self.started.swap(true, Ordering::Relaxed) {
                writer.write_all(SEPARATOR.as_bytes())?;
            }
            writer.write_all(object.as_bytes())
        })
    }

    fn close(&self, destination: &Destination) -> Result<()> {
        destination.write_with(|writer| {
            if self.closed.swap(true, Ordering::Relaxed) {
                return Ok(());
            }
            writer.write_all(ARRAY_END.as_bytes())
        })
    }
}

#[derive(Debug)]
struct Member {
    destination: Destination,
    cursor: Arc<ArrayCursor>,
}

/// Destinations detached from a structured channel whose arrays still need closing
#[derive(Debug)]
pub struct DetachedArrays {
    members: Vec<Member>,
}

impl DetachedArrays {
    /// Write the closing bracket to every destination.
    ///
    /// Every destination gets its attempt even when an earlier one fails.
    pub fn close(self) -> Result<()> {
        let attempted = self.members.len();
        let failures: Vec<LoggerError> = self
            .members
            .iter()
            .filter_map(|member| member.cursor.close(&member.destination).err())
            .collect();

        match LoggerError::from_failures(failures, attempted) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Structured destinations sharing one emitted-event counter
#[derive(Debug, Default)]
pub struct StructuredChannel {
    enabled: bool,
    members: Vec<Member>,
    emitted: u64,
}

impl StructuredChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the channel, register `destination` and open its array.
    ///
    /// The destination stays registered even if writing the opening bracket
    /// fails; the failure is returned.
    pub fn enable(&mut self, destination: Destination) -> Result<()> {
        let opened = open_array(&destination);
        self.attach(destination, true)?;
        opened
    }

    /// Register another destination on an enabled channel and open its array
    pub fn add(&mut self, destination: Destination) -> Result<()> {
        if !self.enabled {
            return Err(LoggerError::channel_disabled("structured"));
        }
        let opened = open_array(&destination);
        self.attach(destination, false)?;
        opened
    }

    /// Register a destination whose opening bracket is already written.
    ///
    /// With `enable` unset this fails on a disabled channel, like [`Self::add`].
    pub(crate) fn attach(&mut self, destination: Destination, enable: bool) -> Result<()> {
        if enable {
            self.enabled = true;
        } else if !self.enabled {
            return Err(LoggerError::channel_disabled("structured"));
        }
        self.members.push(Member {
            destination,
            cursor: Arc::new(ArrayCursor::default()),
        });
        Ok(())
    }

    /// Close the array on every destination, then clear the set and reset the counter.
    pub fn disable(&mut self) -> Result<()> {
        self.detach().close()
    }

    /// Clear the set and reset the counter, leaving the arrays open for the caller to close
    pub fn detach(&mut self) -> DetachedArrays {
        self.emitted = 0;
        self.enabled = false;
        DetachedArrays {
            members: std::mem::take(&mut self.members),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records emitted since the channel was last enabled
    pub fn event_count(&self) -> u64 {
        self.emitted
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.members.iter().map(|member| &member.destination)
    }

    /// Render `record` once, bind it to every destination and bump the shared counter.
    ///
    /// Nothing is written yet; see [`PendingWrite`].
    pub fn prepare(
        &mut self,
        formatter: &StructuredFormatter,
        record: &LogRecord,
    ) -> Result<Vec<PendingWrite>> {
        if !self.enabled || self.members.is_empty() {
            return Ok(Vec::new());
        }

        let object: Arc<str> = formatter.format(record)?.into();
        self.emitted += 1;
        Ok(self
            .members
            .iter()
            .map(|member| {
                PendingWrite::array_element(
                    member.destination.clone(),
                    Arc::clone(&object),
                    Arc::clone(&member.cursor),
                )
            })
            .collect())
    }

    /// Render and write `record` to every destination.
    ///
    /// Returns the number of writes attempted.
    pub fn dispatch(
        &mut self,
        formatter: &StructuredFormatter,
        record: &LogRecord,
        failures: &mut Vec<LoggerError>,
    ) -> usize {
        match self.prepare(formatter, record) {
            Ok(pending) => write_pending(pending, failures),
            Err(e) => {
                failures.push(e);
                self.members.len()
            }
        }
    }
}

/// Write the opening bracket of a destination's array
pub(crate) fn open_array(destination: &Destination) -> Result<()> {
    destination.write_str(ARRAY_START)
}

/// Write the closing bracket of an array that was never attached to a channel
pub(crate) fn close_array(destination: &Destination) -> Result<()> {
    destination.write_str(ARRAY_END)
}

impl Drop for StructuredChannel {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = self.disable() {
                eprintln!("[LOGGER ERROR] Failed to finalize structured output: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::SharedBuffer;
    use crate::core::LogLevel;
    use chrono::{TimeZone, Utc};

    fn record(message: &str) -> LogRecord {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        LogRecord::new(LogLevel::Info, message).with_timestamp(timestamp)
    }

    #[test]
    fn test_object_shape() {
        let formatter = StructuredFormatter::default();
        let object = formatter.format(&record("Hello")).unwrap();
        assert_eq!(
            object,
            r#"{"severity":"INFO","message":"Hello","timestamp":"2025-01-08T10:30:45Z"}"#
        );
    }

    #[test]
    fn test_extras_are_ordered() {
        let formatter = StructuredFormatter::default();
        let object = formatter
            .format(&record("Hello").with_extras(["b", "a"]))
            .unwrap();
        assert!(object.ends_with(r#""extras":["b","a"]}"#));
    }

    #[test]
    fn test_apostrophe_substitution() {
        let formatter = StructuredFormatter::new(JsonEscaping::Apostrophe);
        let object = formatter
            .format(&record(r#"say "hi""#).with_extra(r#"q="x""#))
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&object).unwrap();
        assert_eq!(parsed["message"], "say 'hi'");
        assert_eq!(parsed["extras"][0], "q='x'");
        assert!(!object.contains("\\\""));
    }

    #[test]
    fn test_full_escaping_keeps_quotes() {
        let formatter = StructuredFormatter::new(JsonEscaping::Full);
        let object = formatter
            .format(&record("path C:\\tmp \"quoted\"\n"))
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&object).unwrap();
        assert_eq!(parsed["message"], "path C:\\tmp \"quoted\"\n");
    }

    #[test]
    fn test_array_framing() {
        let buffer = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        channel.enable(buffer.destination("memory")).unwrap();
        assert_eq!(buffer.contents(), "[");

        let mut failures = Vec::new();
        for message in ["one", "two", "three"] {
            channel.dispatch(&formatter, &record(message), &mut failures);
        }
        assert_eq!(channel.event_count(), 3);
        channel.disable().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        let events = parsed.as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2]["message"], "three");
        assert_eq!(channel.event_count(), 0);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_counter_is_shared_across_destinations() {
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        channel.enable(first.destination("first")).unwrap();
        channel.add(second.destination("second")).unwrap();

        let mut failures = Vec::new();
        channel.dispatch(&formatter, &record("one"), &mut failures);
        channel.dispatch(&formatter, &record("two"), &mut failures);

        assert_eq!(channel.event_count(), 2);
        assert_eq!(first.contents(), second.contents());
    }

    #[test]
    fn test_late_destination_gets_valid_array() {
        let early = SharedBuffer::new();
        let late = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        let mut failures = Vec::new();

        channel.enable(early.destination("early")).unwrap();
        channel.dispatch(&formatter, &record("one"), &mut failures);
        channel.add(late.destination("late")).unwrap();
        channel.dispatch(&formatter, &record("two"), &mut failures);
        channel.disable().unwrap();

        let early: serde_json::Value = serde_json::from_str(&early.contents()).unwrap();
        let late: serde_json::Value = serde_json::from_str(&late.contents()).unwrap();
        assert_eq!(early.as_array().unwrap().len(), 2);
        assert_eq!(late.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_add_requires_enable() {
        let buffer = SharedBuffer::new();
        let mut channel = StructuredChannel::new();

        let err = channel.add(buffer.destination("memory")).unwrap_err();
        assert!(matches!(err, LoggerError::ChannelDisabled { channel: "structured" }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_reenable_starts_without_separator() {
        let buffer = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        let mut failures = Vec::new();

        channel.enable(buffer.destination("memory")).unwrap();
        channel.dispatch(&formatter, &record("one"), &mut failures);
        channel.disable().unwrap();

        buffer.clear();
        channel.enable(buffer.destination("memory")).unwrap();
        channel.dispatch(&formatter, &record("two"), &mut failures);
        channel.disable().unwrap();

        assert!(buffer.contents().starts_with("[{"));
        assert!(buffer.contents().ends_with("}]"));
    }

    #[test]
    fn test_drop_closes_array() {
        let buffer = SharedBuffer::new();
        {
            let mut channel = StructuredChannel::new();
            channel.enable(buffer.destination("memory")).unwrap();
        }
        assert_eq!(buffer.contents(), "[]");
    }

    #[test]
    fn test_element_after_detach_is_dropped() {
        let buffer = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        channel.enable(buffer.destination("memory")).unwrap();

        let pending = channel.prepare(&formatter, &record("in flight")).unwrap();
        channel.disable().unwrap();
        for write in &pending {
            write.write().unwrap();
        }

        assert_eq!(buffer.contents(), "[]");
    }

    #[test]
    fn test_out_of_order_writes_keep_array_valid() {
        let buffer = SharedBuffer::new();
        let formatter = StructuredFormatter::default();
        let mut channel = StructuredChannel::new();
        channel.enable(buffer.destination("memory")).unwrap();

        let first = channel.prepare(&formatter, &record("first")).unwrap();
        let second = channel.prepare(&formatter, &record("second")).unwrap();
        second[0].write().unwrap();
        first[0].write().unwrap();
        channel.disable().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        let events = parsed.as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["message"], "second");
    }
}
