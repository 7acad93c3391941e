//! # Scoped Logger
//!
//! A small structured logging library built around scopes.
//!
//! ## Features
//!
//! - **Scoped thresholds**: a [`Logger`] opened with an explicit level changes
//!   the effective level for every inheriting scope until it is dropped
//! - **Two channels**: framed text lines and a JSON array of events, each
//!   with any number of destinations
//! - **Independent contexts**: every [`LoggingContext`] owns its own registry
//!   and channels, with an optional process-wide one
//!
//! ```
//! use scoped_logger::prelude::*;
//!
//! let text = SharedBuffer::new();
//! let context = LoggingContext::builder()
//!     .default_level(LogLevel::Info)
//!     .text_destination(text.destination("memory"))
//!     .build()?;
//!
//! let logger = context.scope(Threshold::Inherit);
//! logger.log_record(LogRecord::new(LogLevel::Info, "Hello").show_timestamp(false));
//! assert_eq!(text.contents(), "[INFO ] Hello\n");
//! # Ok::<(), scoped_logger::LoggerError>(())
//! ```

pub mod channels;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::channels::{Destination, SharedBuffer};
    pub use crate::core::{
        DispatchMetrics, ExtrasLayout, JsonEscaping, LogLevel, LogRecord, Logger, LoggerConfig,
        LoggerError, LoggingContext, LoggingContextBuilder, ResolutionMode, Result,
        SourceLocation, Threshold,
    };
}

pub use channels::{Destination, SharedBuffer};
pub use core::{
    DispatchMetrics, ExtrasLayout, JsonEscaping, LogLevel, LogRecord, Logger, LoggerConfig,
    LoggerError, LoggingContext, LoggingContextBuilder, ResolutionMode, Result, ScopeId,
    SourceLocation, Threshold,
};
