//! Sink trait for log delivery targets

use super::{error::Result, event::LogEvent, severity::Severity};

/// How the dispatcher treats a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Receives a pre-rendered header + message line, always synchronously
    Console,
    /// Receives the structured event; synchronous or detached
    Remote,
}

/// What a sink is handed for one event
#[derive(Debug, Clone, Copy)]
pub enum SinkPayload<'a> {
    Line(&'a str),
    Event(&'a LogEvent),
}

impl SinkPayload<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            SinkPayload::Line(_) => "line",
            SinkPayload::Event(_) => "event",
        }
    }
}

/// Successful result of one `Sink::send`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// Withheld from the destination by policy and written locally instead
    Diverted,
    /// Payload shape the sink does not handle; nothing was written
    Ignored,
}

/// A delivery target. Implementations report failures through the returned
/// `Result` and must never terminate the caller.
pub trait Sink: Send + Sync {
    fn send(&self, severity: Severity, payload: SinkPayload<'_>) -> Result<Outcome>;
    fn kind(&self) -> SinkKind;
    fn name(&self) -> &str;

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Sink names understood by `Logger::set_sink`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkName {
    Stderr,
    Stdout,
    Remote,
    /// Accepted for compatibility; persistent file logging is not provided
    File,
}

impl SinkName {
    /// Resolve a configured name, including aliases. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "stderr" | "console" => Some(SinkName::Stderr),
            "stdout" => Some(SinkName::Stdout),
            "remote" | "loggly" => Some(SinkName::Remote),
            "file" => Some(SinkName::File),
            _ => None,
        }
    }

    /// Key under which the sink is installed
    pub fn key(&self) -> &'static str {
        match self {
            SinkName::Stderr => "stderr",
            SinkName::Stdout => "stdout",
            SinkName::Remote => "remote",
            SinkName::File => "file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_name_aliases() {
        assert_eq!(SinkName::parse("console"), Some(SinkName::Stderr));
        assert_eq!(SinkName::parse("stderr"), Some(SinkName::Stderr));
        assert_eq!(SinkName::parse("stdout"), Some(SinkName::Stdout));
        assert_eq!(SinkName::parse("loggly"), Some(SinkName::Remote));
        assert_eq!(SinkName::parse("remote").map(|n| n.key()), Some("remote"));
        assert_eq!(SinkName::parse("file"), Some(SinkName::File));
        assert_eq!(SinkName::parse("syslog"), None);
        assert_eq!(SinkName::parse("STDOUT"), None);
    }
}
