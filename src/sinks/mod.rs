//! Sink implementations

pub mod console;
pub mod remote;

pub use console::ConsoleSink;
pub use remote::{
    HttpTransport, RemoteConfig, RemoteSink, Transport, DEFAULT_COLLECTOR_BASE,
    DEFAULT_COLLECTOR_TOKEN, DEFAULT_REMOTE_TIMEOUT,
};

pub use crate::core::Sink;
