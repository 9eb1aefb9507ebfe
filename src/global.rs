//! Process-wide default logger
//!
//! The default instance starts with no sinks, the `development` environment
//! and an info threshold. Configure it once at startup, typically with
//! [`init_from_flags`], then log through the free functions:
//!
//! ```no_run
//! use fanout_logger::{global, args, LoggerFlags};
//!
//! let flags = LoggerFlags { log_to_stderr: true, ..LoggerFlags::default() };
//! global::init_from_flags(&flags, "svc").unwrap();
//!
//! global::info(args!["listening on", 8080]);
//! global::errorf(format_args!("request {} failed", 17));
//! ```
//!
//! Setup functions take the write lock; logging takes the read lock, so
//! reconfiguring waits for in-progress log calls to finish.

use crate::config::{LoggerFlags, DEFAULT_ENVIRONMENT};
use crate::core::{Logger, Message, Result, Severity};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

fn instance() -> &'static RwLock<Logger> {
    static DEFAULT: OnceLock<RwLock<Logger>> = OnceLock::new();
    DEFAULT.get_or_init(|| RwLock::new(Logger::new("", DEFAULT_ENVIRONMENT, Severity::Info)))
}

fn read() -> RwLockReadGuard<'static, Logger> {
    instance().read()
}

fn write() -> RwLockWriteGuard<'static, Logger> {
    instance().write()
}

/// Replace the default logger, returning the previous one
pub fn install(logger: Logger) -> Logger {
    std::mem::replace(&mut *write(), logger)
}

/// Configure the default logger from parsed flags
pub fn init_from_flags(flags: &LoggerFlags, app: &str) -> Result<()> {
    let logger = flags.build_logger(app)?;
    // Shut the previous instance down outside the lock
    drop(install(logger));
    Ok(())
}

/// Run `f` with shared access to the default logger
pub fn with_default<R>(f: impl FnOnce(&Logger) -> R) -> R {
    f(&read())
}

/// Run `f` with exclusive access to the default logger
pub fn configure<R>(f: impl FnOnce(&mut Logger) -> R) -> R {
    f(&mut write())
}

pub fn set_level(level: Severity) {
    write().set_level(level);
}

pub fn set_environment(env: impl Into<String>) {
    write().set_environment(env);
}

pub fn set_sink(name: &str) -> Result<()> {
    write().set_sink(name)
}

pub fn set_time_track_threshold(threshold_ms: f64) {
    write().set_time_track_threshold(threshold_ms);
}

#[track_caller]
pub fn debug(message: impl Into<Message>) -> bool {
    read().debug(message)
}

#[track_caller]
pub fn info(message: impl Into<Message>) -> bool {
    read().info(message)
}

#[track_caller]
pub fn warning(message: impl Into<Message>) -> bool {
    read().warning(message)
}

#[track_caller]
pub fn error(message: impl Into<Message>) -> bool {
    read().error(message)
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) -> bool {
    read().debugf(args)
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) -> bool {
    read().infof(args)
}

#[track_caller]
pub fn warningf(args: fmt::Arguments<'_>) -> bool {
    read().warningf(args)
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) -> bool {
    read().errorf(args)
}

#[track_caller]
pub fn fatal(message: impl Into<Message>) -> ! {
    read().fatal(message)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    read().fatalf(args)
}

#[track_caller]
pub fn time_track(start: Instant, name: impl Into<Value>) -> bool {
    read().time_track(start, name)
}

/// Write the default logger's state to its error stream
pub fn debug_logger() {
    let logger = read();
    if let Err(e) = logger.error_stream().write_line(&format!("{:#?}", *logger)) {
        tracing::debug!(error = %e, "failed to write logger state");
    }
}

/// Stop detached delivery on the default logger; see [`Logger::shutdown`]
pub fn shutdown(timeout: Duration) -> bool {
    write().shutdown(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryBuffer, SharedWriter};
    use crate::sinks::ConsoleSink;
    use std::sync::Arc;

    // The default instance is process-wide, so everything touching it lives
    // in one test.
    #[test]
    fn test_default_instance_lifecycle() {
        let console = MemoryBuffer::new();
        let errors = MemoryBuffer::new();
        let mut logger = Logger::new("global-test", "staging", Severity::Info);
        logger.set_error_stream(SharedWriter::memory(&errors));
        logger.install_sink(
            "stdout",
            Arc::new(ConsoleSink::with_writer("stdout", SharedWriter::memory(&console))),
        );
        let previous = install(logger);
        assert!(previous.sink_names().next().is_none());

        let line = line!() + 1;
        assert!(info("from global"));
        assert!(console
            .contents()
            .contains(&format!("global.rs:{}:test_default_instance_lifecycle] from global", line)));

        assert!(!debug("filtered"));
        set_level(Severity::Debug);
        assert!(debugf(format_args!("now {}", "visible")));
        assert!(console.contents().ends_with("] now visible\n"));

        set_sink("nonsense").unwrap();
        assert_eq!(with_default(|l| l.sink_names().count()), 1);

        set_environment("production");
        assert_eq!(with_default(|l| l.environment().to_string()), "production");

        debug_logger();
        assert!(errors.contents().contains("global-test"));

        set_time_track_threshold(-1.0);
        assert!(time_track(Instant::now(), "tracked"));

        assert!(shutdown(Duration::from_millis(100)));
        configure(|l| l.remove_sink("stdout"));
    }
}
