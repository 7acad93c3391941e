//! Core logger types

pub mod config;
pub mod context;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod timestamp;

pub use config::{ExtrasLayout, JsonEscaping, LoggerConfig, ResolutionMode};
pub use context::{LoggingContext, LoggingContextBuilder};
pub use error::{LoggerError, Result};
pub use log_level::{LogLevel, Threshold, PADDED_NAME_WIDTH};
pub use log_record::{LogRecord, SourceLocation};
pub use logger::Logger;
pub use metrics::DispatchMetrics;
pub use registry::{ScopeId, ScopeRegistry};
pub use timestamp::format_timestamp;
