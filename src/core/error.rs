//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A payload that cannot be encoded into a remote record
    #[error("Serialization error ({field}): {message}")]
    Serialization { field: String, message: String },

    /// Sink handed a payload shape it cannot deliver
    #[error("Sink '{sink}' does not accept {payload} payloads")]
    UnsupportedPayload { sink: String, payload: String },

    /// Transport-level failure talking to the remote collector
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote collector answered with a non-success status
    #[error("{status} {body}")]
    RemoteStatus { status: u16, body: String },

    /// Delivery failed; carries the serialized record so it is not lost
    #[error("{reason}] {record}")]
    Undelivered {
        #[source]
        reason: Box<LoggerError>,
        record: String,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Detached queue full with buffer details
    #[error("Detached queue full: {current}/{max} deliveries pending")]
    QueueFull { current: usize, max: usize },

    /// Detached dispatcher already stopped
    #[error("Detached dispatcher already stopped")]
    DispatcherStopped,

    /// Sink panicked while delivering
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error for a record field
    pub fn serialization(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Serialization {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_payload(sink: impl Into<String>, payload: impl Into<String>) -> Self {
        LoggerError::UnsupportedPayload {
            sink: sink.into(),
            payload: payload.into(),
        }
    }

    /// Create a remote status error from the collector response
    pub fn remote_status(status: u16, body: impl Into<String>) -> Self {
        LoggerError::RemoteStatus {
            status,
            body: body.into(),
        }
    }

    /// Wrap a delivery failure together with the record that was not delivered
    pub fn undelivered(reason: LoggerError, record: impl Into<String>) -> Self {
        LoggerError::Undelivered {
            reason: Box::new(reason),
            record: record.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::queue_full(100, 1000);
        assert!(matches!(err, LoggerError::QueueFull { .. }));

        let err = LoggerError::config("remote", "no remote sink installed");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::serialization("msg.float", "NaN is not valid JSON");
        assert!(matches!(err, LoggerError::Serialization { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::remote_status(403, "forbidden");
        assert_eq!(err.to_string(), "403 forbidden");

        let err = LoggerError::unsupported_payload("remote", "line");
        assert_eq!(err.to_string(), "Sink 'remote' does not accept line payloads");

        let err = LoggerError::queue_full(8, 8);
        assert_eq!(err.to_string(), "Detached queue full: 8/8 deliveries pending");

        let err = LoggerError::undelivered(LoggerError::remote_status(500, "oops"), "{}");
        assert_eq!(err.to_string(), "500 oops] {}");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LoggerError::io_operation("writing console line", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing console line"));
        assert!(err.to_string().contains("pipe closed"));
    }
}
