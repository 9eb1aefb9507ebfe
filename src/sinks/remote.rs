//! Remote collector sink
//!
//! Serializes each event into a [`RemoteRecord`] and posts it as JSON to an
//! HTTP log collector. Records from environments outside the
//! [`EnvironmentPolicy`] never leave the process; they are written to the
//! local error stream instead.

use crate::core::{
    EnvironmentPolicy, LoggerError, Outcome, RemoteRecord, Result, Severity, SharedWriter, Sink,
    SinkKind, SinkPayload,
};
use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_COLLECTOR_BASE: &str = "https://logs-01.loggly.com/inputs/";

/// Placeholder token used when none is configured
pub const DEFAULT_COLLECTOR_TOKEN: &str = "apikey";

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts one serialized record to a URL
///
/// Implemented by [`HttpTransport`]; tests substitute their own.
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: &str) -> Result<()>;
}

/// `reqwest` blocking client with a bounded request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &str) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_body = response
                .text()
                .unwrap_or_else(|_| "Could not read error response body".to_string());
            return Err(LoggerError::remote_status(status, error_body));
        }
        Ok(())
    }
}

/// Where and how the remote sink delivers
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub policy: EnvironmentPolicy,
}

impl RemoteConfig {
    /// Collector endpoint `<base><token>/tag/<tag>`
    pub fn collector(token: &str, tag: &str) -> Self {
        Self {
            endpoint: format!("{}{}/tag/{}", DEFAULT_COLLECTOR_BASE, token, tag),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: EnvironmentPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let program = &crate::process::ProcessInfo::current().program;
        Self {
            endpoint: format!(
                "{}{}/tag/{}",
                DEFAULT_COLLECTOR_BASE, DEFAULT_COLLECTOR_TOKEN, program
            ),
            timeout: DEFAULT_REMOTE_TIMEOUT,
            policy: EnvironmentPolicy::default(),
        }
    }
}

pub struct RemoteSink {
    url: String,
    transport: Arc<dyn Transport>,
    policy: EnvironmentPolicy,
    errors: SharedWriter,
}

impl RemoteSink {
    /// Sink posting over HTTP to `config.endpoint`.
    ///
    /// Diverted records are written to `errors`.
    pub fn new(config: &RemoteConfig, errors: SharedWriter) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport), errors))
    }

    pub fn with_transport(
        config: &RemoteConfig,
        transport: Arc<dyn Transport>,
        errors: SharedWriter,
    ) -> Self {
        Self {
            url: config.endpoint.clone(),
            transport,
            policy: config.policy.clone(),
            errors,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &EnvironmentPolicy {
        &self.policy
    }
}

impl Sink for RemoteSink {
    fn send(&self, severity: Severity, payload: SinkPayload<'_>) -> Result<Outcome> {
        let SinkPayload::Event(event) = payload else {
            return Err(LoggerError::unsupported_payload("remote", payload.describe()));
        };

        let mut record = RemoteRecord::build(event)?;
        record.level = severity.as_char().to_string();
        let body = record.to_json()?;

        if !self.policy.is_allowed(&event.env) {
            tracing::trace!(env = %event.env, "remote delivery suppressed by environment policy");
            self.errors
                .write_line(&format!("E env not set: {}] {}", event.env, body))
                .map_err(|e| LoggerError::io_operation("writing diverted record", e))?;
            return Ok(Outcome::Diverted);
        }

        self.transport
            .post(&self.url, &body)
            .map_err(|reason| LoggerError::undelivered(reason, body))?;
        Ok(Outcome::Delivered)
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Remote
    }

    fn name(&self) -> &str {
        "remote"
    }
}
