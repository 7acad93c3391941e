//! Call-site logging macros.
//!
//! These format the message like `format!` and attach the caller's
//! `file!()`/`line!()` as the record's source location.
//!
//! # Examples
//!
//! ```
//! use scoped_logger::prelude::*;
//! use scoped_logger::info;
//!
//! let context = LoggingContext::new();
//! let logger = context.scope(LogLevel::Debug);
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at `level` with the call site's location.
///
/// # Examples
///
/// ```
/// # use scoped_logger::prelude::*;
/// # let logger = LoggingContext::new().scope(Threshold::Inherit);
/// use scoped_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_record(
            $crate::LogRecord::new($level, format!($($arg)+)).with_location(file!(), line!()),
        )
    };
}

/// Log with extras and the call site's location.
///
/// # Examples
///
/// ```
/// # use scoped_logger::prelude::*;
/// # let logger = LoggingContext::new().scope(Threshold::Inherit);
/// use scoped_logger::log_extras;
/// log_extras!(logger, LogLevel::Warn, ["retry=3", "host=db1"], "Connection lost");
/// ```
#[macro_export]
macro_rules! log_extras {
    ($logger:expr, $level:expr, [$($extra:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log_record(
            $crate::LogRecord::new($level, format!($($arg)+))
                .with_extras({
                    let extras: ::std::vec::Vec<::std::string::String> =
                        ::std::vec![$($extra.to_string()),*];
                    extras
                })
                .with_location(file!(), line!()),
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Logging never terminates the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
