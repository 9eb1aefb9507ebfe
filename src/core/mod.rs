//! Core logger types and traits

pub mod call_site;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod event;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod overflow_policy;
pub mod record;
pub mod severity;
pub mod sink;
pub mod timestamp;
pub mod writer;

pub use call_site::CallSite;
pub use dispatch::{DetachedConfig, DetachedDispatcher, DEFAULT_SHUTDOWN_TIMEOUT};
pub use environment::{EnvironmentPolicy, DEFAULT_REMOTE_ENVIRONMENTS};
pub use error::{LoggerError, Result};
pub use event::{format_header, LogEvent};
pub use logger::{
    Logger, LoggerBuilder, RemoteDelivery, TimeTrack, DEFAULT_TIME_TRACK_THRESHOLD_MS,
};
pub use message::{Arg, Message};
pub use metrics::DispatchMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use record::{classify_message, RemoteRecord};
pub use severity::Severity;
pub use sink::{Outcome, Sink, SinkKind, SinkName, SinkPayload};
pub use timestamp::{iso8601, system_clock, Clock};
pub use writer::{MemoryBuffer, SharedWriter};
