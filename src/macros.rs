//! Logging macros for ergonomic log message formatting.
//!
//! These macros work like `println!`: the format string is only evaluated
//! once the logger's threshold has accepted the event. The call site,
//! including the enclosing function name, is captured at the invocation.
//!
//! # Examples
//!
//! ```
//! use fanout_logger::prelude::*;
//! use fanout_logger::info;
//!
//! let logger = Logger::new("svc", "development", Severity::Info);
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log at an explicit severity.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::new("svc", "development", Severity::Info);
/// use fanout_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_formatted_at($severity, $crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::new("svc", "development", Severity::Debug);
/// use fanout_logger::debug;
/// debug!(logger, "Cache size: {}", 1024);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::new("svc", "development", Severity::Info);
/// use fanout_logger::warning;
/// warning!(logger, "Disk usage at {}%", 91);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Alias for [`warning!`]
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::warning!($logger, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log at error severity regardless of the threshold, then exit with status 1.
///
/// ```no_run
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::new("svc", "development", Severity::Info);
/// use fanout_logger::fatal;
/// fatal!(logger, "Cannot bind port {}", 8080);
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_at(
            $crate::call_site!(),
            $crate::Message::Formatted(::std::format!($($arg)+)),
        )
    };
}
