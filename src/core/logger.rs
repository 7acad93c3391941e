//! Scoped logger
//!
//! A [`Logger`] is one scope in the registry of its context. It is opened when
//! constructed and released when dropped, so early returns, `?` and unwinding
//! all end the scope.

use super::{
    context::{Dispatch, LoggingContext},
    error::{LoggerError, Result},
    log_level::{LogLevel, Threshold},
    log_record::LogRecord,
    registry::ScopeId,
};

/// # Example
///
/// ```
/// use scoped_logger::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let context = LoggingContext::builder()
///     .default_level(LogLevel::Warn)
///     .text_destination(buffer.destination("memory"))
///     .build()
///     .unwrap();
///
/// let outer = context.scope(Threshold::Inherit);
/// outer.info("hidden at the default WARN level");
///
/// {
///     let _verbose = context.scope(LogLevel::Debug);
///     outer.info("shown while the verbose scope is alive");
/// }
///
/// outer.info("hidden again");
/// assert_eq!(buffer.contents().lines().count(), 1);
/// ```
pub struct Logger {
    context: LoggingContext,
    id: ScopeId,
}

impl Logger {
    /// Open a scope in the process-wide context.
    ///
    /// See [`LoggingContext::global`]: structured output sent there must be
    /// closed with `disable_structured()` before exit.
    pub fn new(threshold: impl Into<Threshold>) -> Self {
        Self::in_context(LoggingContext::global(), threshold)
    }

    /// Open an inheriting scope in the process-wide context
    pub fn inherit() -> Self {
        Self::new(Threshold::Inherit)
    }

    pub fn in_context(context: &LoggingContext, threshold: impl Into<Threshold>) -> Self {
        let id = context.open_scope(threshold.into());
        Self {
            context: context.clone(),
            id,
        }
    }

    /// Open a nested scope in the same context
    pub fn child(&self, threshold: impl Into<Threshold>) -> Logger {
        Self::in_context(&self.context, threshold)
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn context(&self) -> &LoggingContext {
        &self.context
    }

    /// This scope's own setting
    pub fn threshold(&self) -> Threshold {
        self.context.scope_threshold(self.id)
    }

    pub fn set_threshold(&self, threshold: impl Into<Threshold>) {
        self.context.set_scope_threshold(self.id, threshold.into());
    }

    /// Level in force for this scope under the context's resolution mode
    pub fn effective_level(&self) -> LogLevel {
        self.context.resolve(self.id)
    }

    /// Whether a call at `level` passes; the threshold is inclusive
    #[inline]
    pub fn should_emit(&self, level: LogLevel) -> bool {
        level >= self.effective_level()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_record(LogRecord::new(level, message));
    }

    /// Log with extra annotations
    pub fn log_with<I, S>(&self, level: LogLevel, message: impl Into<String>, extras: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_record(LogRecord::new(level, message).with_extras(extras));
    }

    /// Log a fully specified record. Write failures are reported on stderr.
    pub fn log_record(&self, record: LogRecord) {
        if let Some(Dispatch { failures, .. }) = self.filter_and_dispatch(&record) {
            for failure in failures {
                eprintln!("[LOGGER ERROR] {}", failure);
            }
        }
    }

    /// Like [`Logger::log_record`], but returns write failures.
    ///
    /// `Ok(false)` means the record was filtered out.
    pub fn try_log(&self, record: LogRecord) -> Result<bool> {
        match self.filter_and_dispatch(&record) {
            None => Ok(false),
            Some(Dispatch {
                attempted,
                failures,
            }) => match LoggerError::from_failures(failures, attempted) {
                Some(err) => Err(err),
                None => Ok(true),
            },
        }
    }

    fn filter_and_dispatch(&self, record: &LogRecord) -> Option<Dispatch> {
        let metrics = self.context.metrics();
        if !self.should_emit(record.level) {
            metrics.record_filtered();
            return None;
        }
        metrics.record_accepted();
        Some(self.context.dispatch(record))
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.context.close_scope(self.id);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.id)
            .field("threshold", &self.threshold())
            .finish()
    }
}
