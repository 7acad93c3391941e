//! Logging context
//!
//! A context owns one scope registry and one set of output channels. Loggers
//! created from the same context see each other's thresholds; separate
//! contexts are fully independent, which keeps tests from interfering.
//!
//! The registry, each channel and the structured event counter sit behind
//! their own mutex, so a context can be shared between threads. Threshold
//! resolution is still a single registry, so a scope opened on one thread
//! affects the effective level seen by the others.

use super::{
    config::{ExtrasLayout, JsonEscaping, LoggerConfig, ResolutionMode},
    error::{LoggerError, Result},
    log_level::{LogLevel, Threshold},
    log_record::LogRecord,
    logger::Logger,
    metrics::DispatchMetrics,
    registry::{ScopeId, ScopeRegistry},
};
use crate::channels::structured::{close_array, open_array};
use crate::channels::{
    write_pending, Destination, StructuredChannel, StructuredFormatter, TextChannel,
    TextFormatter,
};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

static GLOBAL_CONTEXT: OnceLock<LoggingContext> = OnceLock::new();

struct ContextInner {
    config: LoggerConfig,
    registry: Mutex<ScopeRegistry>,
    text: Mutex<TextChannel>,
    structured: Mutex<StructuredChannel>,
    text_formatter: TextFormatter,
    structured_formatter: StructuredFormatter,
    metrics: DispatchMetrics,
}

/// Shared handle to a logging context. Cloning is cheap.
#[derive(Clone)]
pub struct LoggingContext {
    inner: Arc<ContextInner>,
}

/// Outcome of dispatching one record to both channels
#[derive(Debug, Default)]
pub(crate) struct Dispatch {
    pub attempted: usize,
    pub failures: Vec<LoggerError>,
}

impl LoggingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        let text_formatter =
            TextFormatter::new(config.extras_layout).with_colors(config.colorize_levels);
        let structured_formatter = StructuredFormatter::new(config.json_escaping);

        Self {
            inner: Arc::new(ContextInner {
                config,
                registry: Mutex::new(ScopeRegistry::new()),
                text: Mutex::new(TextChannel::new()),
                structured: Mutex::new(StructuredChannel::new()),
                text_formatter,
                structured_formatter,
                metrics: DispatchMetrics::new(),
            }),
        }
    }

    /// Process-wide context, created with the default configuration on first use.
    ///
    /// The global context lives in a `static` and is never dropped, so its
    /// structured arrays are not closed automatically. Call
    /// [`LoggingContext::disable_structured`] before the process exits.
    pub fn global() -> &'static LoggingContext {
        GLOBAL_CONTEXT.get_or_init(LoggingContext::new)
    }

    /// Install `context` as the process-wide context.
    ///
    /// Fails if the global context was already initialized, either by an
    /// earlier call or by first use of [`LoggingContext::global`].
    pub fn install_global(context: LoggingContext) -> Result<()> {
        GLOBAL_CONTEXT
            .set(context)
            .map_err(|_| LoggerError::config("global context", "already initialized"))
    }

    /// Open a new scope in this context
    pub fn scope(&self, threshold: impl Into<Threshold>) -> Logger {
        Logger::in_context(self, threshold)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.inner.metrics
    }

    /// Level applied when no live scope sets one
    pub fn default_level(&self) -> LogLevel {
        self.inner.config.default_level()
    }

    /// Pre-size the registry for an expected maximum nesting depth.
    ///
    /// `capacity` must exceed the current number of registry entries.
    pub fn reserve_scopes(&self, capacity: usize) -> Result<()> {
        self.inner.registry.lock().reserve(capacity)
    }

    /// Number of live scopes
    pub fn scope_depth(&self) -> usize {
        self.inner.registry.lock().depth()
    }

    pub(crate) fn open_scope(&self, threshold: Threshold) -> ScopeId {
        self.inner.registry.lock().push(threshold)
    }

    pub(crate) fn close_scope(&self, id: ScopeId) {
        self.inner.registry.lock().release(id);
    }

    pub(crate) fn scope_threshold(&self, id: ScopeId) -> Threshold {
        self.inner
            .registry
            .lock()
            .threshold(id)
            .unwrap_or(Threshold::Inherit)
    }

    pub(crate) fn set_scope_threshold(&self, id: ScopeId, threshold: Threshold) {
        self.inner.registry.lock().set_threshold(id, threshold);
    }

    pub(crate) fn resolve(&self, id: ScopeId) -> LogLevel {
        self.inner.registry.lock().resolve(
            id,
            self.inner.config.resolution_mode,
            self.default_level(),
        )
    }

    // Text channel

    pub fn enable_text(&self, destination: Destination) {
        self.inner.text.lock().enable(destination);
    }

    pub fn add_text(&self, destination: Destination) -> Result<()> {
        self.inner.text.lock().add(destination)
    }

    pub fn disable_text(&self) {
        self.inner.text.lock().disable();
    }

    pub fn is_text_enabled(&self) -> bool {
        self.inner.text.lock().is_enabled()
    }

    // Structured channel

    pub fn enable_structured(&self, destination: Destination) -> Result<()> {
        let opened = open_array(&destination);
        self.inner.structured.lock().attach(destination, true)?;
        opened
    }

    pub fn add_structured(&self, destination: Destination) -> Result<()> {
        if !self.is_structured_enabled() {
            return Err(LoggerError::channel_disabled("structured"));
        }
        let opened = open_array(&destination);
        let attached = self.inner.structured.lock().attach(destination.clone(), false);
        if let Err(e) = attached {
            // Disabled concurrently; close the array opened above
            if let Err(close_err) = close_array(&destination) {
                eprintln!("[LOGGER ERROR] {}", close_err);
            }
            return Err(e);
        }
        opened
    }

    /// Close the JSON array on every structured destination and clear the channel
    pub fn disable_structured(&self) -> Result<()> {
        let detached = self.inner.structured.lock().detach();
        detached.close()
    }

    pub fn is_structured_enabled(&self) -> bool {
        self.inner.structured.lock().is_enabled()
    }

    /// Records emitted to the structured channel since it was last enabled
    pub fn structured_event_count(&self) -> u64 {
        self.inner.structured.lock().event_count()
    }

    /// Render `record` to every enabled destination of both channels.
    ///
    /// No filtering happens here; that is the scope's job. All destinations
    /// are attempted even when some fail.
    pub fn emit(&self, record: &LogRecord) -> Result<()> {
        let Dispatch {
            attempted,
            failures,
        } = self.dispatch(record);
        match LoggerError::from_failures(failures, attempted) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub(crate) fn dispatch(&self, record: &LogRecord) -> Dispatch {
        let inner = &self.inner;
        let mut dispatch = Dispatch::default();

        // Render under the channel locks, write after releasing them so a
        // destination writer can call back into this context.
        let text = inner.text.lock().prepare(&inner.text_formatter, record);
        let structured = inner
            .structured
            .lock()
            .prepare(&inner.structured_formatter, record);

        dispatch.attempted += write_pending(text, &mut dispatch.failures);
        match structured {
            Ok(pending) => dispatch.attempted += write_pending(pending, &mut dispatch.failures),
            Err(e) => {
                dispatch.attempted += 1;
                dispatch.failures.push(e);
            }
        }

        inner
            .metrics
            .record_writes(dispatch.attempted, dispatch.failures.len());
        dispatch
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingContext")
            .field("config", &self.inner.config)
            .field("scope_depth", &self.scope_depth())
            .field("text_enabled", &self.is_text_enabled())
            .field("structured_enabled", &self.is_structured_enabled())
            .finish()
    }
}

/// Builder for a [`LoggingContext`] with a fluent API
///
/// # Example
/// ```
/// use scoped_logger::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let context = LoggingContext::builder()
///     .default_level(LogLevel::Debug)
///     .extras_layout(ExtrasLayout::SeparateLines)
///     .text_destination(buffer.destination("memory"))
///     .build()
///     .unwrap();
///
/// let logger = context.scope(Threshold::Inherit);
/// logger.debug("visible");
/// assert_eq!(buffer.contents().lines().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggingContextBuilder {
    config: LoggerConfig,
    text: Vec<Destination>,
    structured: Vec<Destination>,
    scope_capacity: Option<usize>,
}

impl LoggingContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Default level regardless of build profile
    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: LogLevel) -> Self {
        self.config.default_level_override = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn extras_layout(mut self, layout: ExtrasLayout) -> Self {
        self.config.extras_layout = layout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn json_escaping(mut self, escaping: JsonEscaping) -> Self {
        self.config.json_escaping = escaping;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.config.resolution_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colorize_levels(mut self, colorize: bool) -> Self {
        self.config.colorize_levels = colorize;
        self
    }

    /// Register a text destination; the first one enables the channel
    #[must_use = "builder methods return a new value"]
    pub fn text_destination(mut self, destination: Destination) -> Self {
        self.text.push(destination);
        self
    }

    /// Register a structured destination; the first one enables the channel
    #[must_use = "builder methods return a new value"]
    pub fn structured_destination(mut self, destination: Destination) -> Self {
        self.structured.push(destination);
        self
    }

    /// Expected maximum scope nesting depth
    #[must_use = "builder methods return a new value"]
    pub fn scope_capacity(mut self, capacity: usize) -> Self {
        self.scope_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<LoggingContext> {
        self.config.validate()?;
        let context = LoggingContext::with_config(self.config);

        if let Some(capacity) = self.scope_capacity {
            context.reserve_scopes(capacity)?;
        }

        let mut text = self.text.into_iter();
        if let Some(first) = text.next() {
            context.enable_text(first);
            for destination in text {
                context.add_text(destination)?;
            }
        }

        let mut structured = self.structured.into_iter();
        if let Some(first) = structured.next() {
            context.enable_structured(first)?;
            for destination in structured {
                context.add_structured(destination)?;
            }
        }

        Ok(context)
    }
}

impl LoggingContext {
    /// Create a builder for a context
    #[must_use]
    pub fn builder() -> LoggingContextBuilder {
        LoggingContextBuilder::new()
    }
}
