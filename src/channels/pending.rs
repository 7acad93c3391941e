//! Writes prepared under a channel lock and performed after it is released

use super::destination::Destination;
use super::structured::ArrayCursor;
use crate::core::{LoggerError, Result};
use std::sync::Arc;

/// One rendered record bound to one destination.
///
/// Channels only hand these out; nothing is written until [`PendingWrite::write`]
/// runs, by which time the channel lock has been dropped. A destination
/// writer may therefore call back into the context it is registered with.
#[derive(Debug)]
pub struct PendingWrite {
    destination: Destination,
    text: Arc<str>,
    array: Option<Arc<ArrayCursor>>,
}

impl PendingWrite {
    pub(crate) fn plain(destination: Destination, text: Arc<str>) -> Self {
        Self {
            destination,
            text,
            array: None,
        }
    }

    /// An element of the JSON array tracked by `array`
    pub(crate) fn array_element(
        destination: Destination,
        text: Arc<str>,
        array: Arc<ArrayCursor>,
    ) -> Self {
        Self {
            destination,
            text,
            array: Some(array),
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn write(&self) -> Result<()> {
        match &self.array {
            Some(array) => array.write_element(&self.destination, &self.text),
            None => self.destination.write_str(&self.text),
        }
    }
}

/// Perform every write, collecting failures. Returns the number attempted.
pub fn write_pending(pending: Vec<PendingWrite>, failures: &mut Vec<LoggerError>) -> usize {
    let attempted = pending.len();
    for write in pending {
        if let Err(e) = write.write() {
            failures.push(e);
        }
    }
    attempted
}
