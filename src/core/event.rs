//! Log event structure and console header formatting

use super::call_site::CallSite;
use super::message::Message;
use super::severity::Severity;
use super::timestamp::iso8601;
use crate::process::ProcessInfo;
use chrono::{DateTime, Utc};

/// One accepted log call. Built once per dispatch and never stored.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub severity: Severity,
    pub message: Message,
    pub timestamp: DateTime<Utc>,
    pub call_site: CallSite,
    pub env: String,
    pub app: String,
    pub host: String,
    pub pid: u32,
}

impl LogEvent {
    /// Event stamped with the current time and this process' metadata.
    /// The environment label starts empty.
    pub fn new(severity: Severity, message: impl Into<Message>, call_site: CallSite) -> Self {
        let process = ProcessInfo::current();
        Self {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            call_site,
            env: String::new(),
            app: process.program.clone(),
            host: process.host.clone(),
            pid: process.pid,
        }
    }

    pub fn with_labels(
        mut self,
        env: impl Into<String>,
        app: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        self.env = env.into();
        self.app = app.into();
        self.host = host.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn header(&self) -> String {
        format_header(self.severity, self.pid, &self.timestamp, &self.call_site)
    }

    /// Header, rendered message and trailing newline, as written by console sinks
    pub fn console_line(&self) -> String {
        let mut line = self.header();
        line.push_str(&self.message.render());
        line.push('\n');
        line
    }
}

/// Format a console header
///
/// ```text
/// I4242 2025-01-08T10:30:45.123Z main.rs:12:main]
/// ```
///
/// The header always starts with the severity character immediately followed
/// by the process id and ends with `"] "`.
pub fn format_header(
    severity: Severity,
    pid: u32,
    timestamp: &DateTime<Utc>,
    call_site: &CallSite,
) -> String {
    format!(
        "{}{} {} {}] ",
        severity.as_char(),
        pid,
        iso8601(timestamp),
        call_site
    )
}
