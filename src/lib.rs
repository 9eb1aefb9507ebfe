//! # Fanout Logger
//!
//! A leveled logger that fans each accepted event out to several sinks: the
//! console streams and a remote HTTP log collector.
//!
//! ## Features
//!
//! - **Threshold first**: rejected events are never formatted
//! - **Per-sink formatting**: console sinks get a header line, the remote
//!   collector gets a structured JSON record
//! - **Environment gating**: only allowed environments transmit remotely;
//!   everything else is diverted to the local error stream
//! - **Detached delivery**: remote posts can run on a bounded worker pool so
//!   logging never waits on the network
//! - **Isolated sinks**: a failing or panicking sink never affects another
//!   sink or the caller
//!
//! ## Example
//!
//! ```
//! use fanout_logger::prelude::*;
//!
//! let mut logger = Logger::new("svc", "development", Severity::Info);
//! logger.set_sink("stdout").unwrap();
//!
//! logger.info(args!["listening on", 8080]);
//! logger.warningf(format_args!("{} retries left", 2));
//! ```

pub mod config;
pub mod core;
pub mod global;
pub mod macros;
pub mod process;
pub mod sinks;

pub mod prelude {
    pub use crate::args;
    pub use crate::config::LoggerFlags;
    pub use crate::core::{
        Arg, CallSite, DispatchMetrics, EnvironmentPolicy, Logger, LoggerBuilder, LoggerError,
        Message, OverflowCallback, OverflowPolicy, RemoteDelivery, Result, Severity, Sink,
        SinkKind, SinkPayload, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, RemoteConfig, RemoteSink};
}

pub use crate::config::{LoggerFlags, DEFAULT_ENVIRONMENT};
pub use crate::core::{
    Arg, CallSite, DetachedConfig, DispatchMetrics, EnvironmentPolicy, LogEvent, Logger,
    LoggerBuilder, LoggerError, MemoryBuffer, Message, Outcome, OverflowCallback, OverflowPolicy,
    RemoteDelivery, RemoteRecord, Result, Severity, SharedWriter, Sink, SinkKind, SinkName,
    SinkPayload, TimeTrack, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::process::ProcessInfo;
pub use crate::sinks::{ConsoleSink, HttpTransport, RemoteConfig, RemoteSink, Transport};
