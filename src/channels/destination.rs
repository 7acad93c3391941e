//! Externally owned output destinations

use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Non-owning handle to a writable destination.
///
/// Cloning a destination clones the handle, not the writer; the caller keeps
/// its own `Arc` and stays in charge of the underlying resource. Registering
/// the same destination twice is allowed and produces duplicate output.
#[derive(Clone)]
pub struct Destination {
    name: Arc<str>,
    writer: SharedWriter,
}

impl Destination {
    /// Wrap a writer that the caller keeps shared ownership of
    ///
    /// # Example
    ///
    /// ```
    /// use parking_lot::Mutex;
    /// use scoped_logger::Destination;
    /// use std::sync::Arc;
    ///
    /// let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
    /// let destination = Destination::new("memory", Arc::clone(&buffer));
    /// destination.write_str("hello").unwrap();
    /// assert_eq!(buffer.lock().as_slice(), b"hello");
    /// ```
    pub fn new<W>(name: impl Into<String>, writer: Arc<Mutex<W>>) -> Self
    where
        W: Write + Send + 'static,
    {
        let name: String = name.into();
        Self {
            name: name.into(),
            writer,
        }
    }

    /// Take ownership of a writer that nothing else needs to reach
    pub fn from_writer<W>(name: impl Into<String>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::new(name, Arc::new(Mutex::new(writer)))
    }

    pub fn stdout() -> Self {
        Self::from_writer("stdout", io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer("stderr", io::stderr())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write `text` in full and flush
    pub fn write_str(&self, text: &str) -> Result<()> {
        self.write_with(|writer| writer.write_all(text.as_bytes()))
    }

    /// Run `write` against the locked writer, then flush.
    ///
    /// The writer lock is held for the whole call, so decisions `write` makes
    /// about what to emit are ordered with every other write to this
    /// destination.
    pub(crate) fn write_with<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut (dyn Write + Send)) -> io::Result<()>,
    {
        let mut writer = self.writer.lock();
        write(&mut *writer)
            .and_then(|()| writer.flush())
            .map_err(|e| LoggerError::destination_write(self.name(), e))
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination").field("name", &self.name).finish()
    }
}

/// In-memory destination, readable while the logger writes to it
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A destination writing into this buffer
    pub fn destination(&self, name: impl Into<String>) -> Destination {
        Destination::new(name, Arc::clone(&self.bytes))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_shared_buffer_destination() {
        let buffer = SharedBuffer::new();
        let destination = buffer.destination("memory");

        destination.write_str("one ").unwrap();
        destination.clone().write_str("two").unwrap();

        assert_eq!(buffer.contents(), "one two");
        assert_eq!(destination.name(), "memory");

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_write_failure_names_destination() {
        let destination = Destination::from_writer("broken", BrokenPipe);
        let err = destination.write_str("lost").unwrap_err();

        assert!(matches!(err, LoggerError::DestinationWrite { .. }));
        assert!(err.to_string().contains("broken"));
    }
}
