//! Command-line and environment configuration
//!
//! [`LoggerFlags`] is meant to be flattened into an application's own
//! `clap` parser:
//!
//! ```
//! use clap::Parser;
//! use fanout_logger::LoggerFlags;
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     log: LoggerFlags,
//! }
//!
//! let cli = Cli::parse_from(["svc", "--log-to-stdout", "--log-level", "2"]);
//! let logger = cli.log.build_logger("svc").unwrap();
//! assert!(logger.has_sink("stdout"));
//! ```

use crate::core::{
    Logger, LoggerError, RemoteDelivery, Result, Severity, DEFAULT_TIME_TRACK_THRESHOLD_MS,
};
use crate::process::ProcessInfo;
use crate::sinks::{RemoteConfig, DEFAULT_COLLECTOR_TOKEN, DEFAULT_REMOTE_TIMEOUT};
use std::time::Duration;

pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct LoggerFlags {
    /// Write log lines to stderr
    #[arg(long, env = "FANOUT_LOG_TO_STDERR")]
    pub log_to_stderr: bool,

    /// Write log lines to stdout
    #[arg(long, env = "FANOUT_LOG_TO_STDOUT")]
    pub log_to_stdout: bool,

    /// Post records to the remote collector, waiting for each post
    #[arg(long, env = "FANOUT_LOG_TO_REMOTE")]
    pub log_to_remote: bool,

    /// Post records to the remote collector without waiting
    #[arg(long, env = "FANOUT_LOG_TO_REMOTE_ASYNC")]
    pub log_to_remote_async: bool,

    /// Environment label; only production and staging transmit remotely
    #[arg(long, default_value = DEFAULT_ENVIRONMENT, env = "FANOUT_LOG_ENV")]
    pub log_env: String,

    /// Minimum severity: 0 debug, 1 info, 2 warning, 3 error, 4 fatal
    #[arg(long, default_value_t = 1, allow_negative_numbers = true, env = "FANOUT_LOG_LEVEL")]
    pub log_level: i64,

    /// Minimum elapsed milliseconds before time tracking logs
    #[arg(long, default_value_t = DEFAULT_TIME_TRACK_THRESHOLD_MS, env = "FANOUT_LOG_TIME_THRESHOLD")]
    pub log_time_threshold: f64,

    /// Full collector URL, overriding the token-based endpoint
    #[arg(long, env = "FANOUT_LOG_COLLECTOR_URL")]
    pub log_collector_url: Option<String>,

    /// Collector input token
    #[arg(long, env = "FANOUT_LOG_COLLECTOR_TOKEN")]
    pub log_collector_token: Option<String>,

    /// Remote request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_REMOTE_TIMEOUT.as_millis() as u64, env = "FANOUT_LOG_REMOTE_TIMEOUT_MS")]
    pub log_remote_timeout_ms: u64,
}

impl Default for LoggerFlags {
    fn default() -> Self {
        Self {
            log_to_stderr: false,
            log_to_stdout: false,
            log_to_remote: false,
            log_to_remote_async: false,
            log_env: DEFAULT_ENVIRONMENT.to_string(),
            log_level: 1,
            log_time_threshold: DEFAULT_TIME_TRACK_THRESHOLD_MS,
            log_collector_url: None,
            log_collector_token: None,
            log_remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT.as_millis() as u64,
        }
    }
}

impl LoggerFlags {
    /// Threshold for the numeric level; codes outside 0..=4 mean info
    pub fn threshold(&self) -> Severity {
        u8::try_from(self.log_level)
            .map(Severity::from_code)
            .unwrap_or_default()
    }

    pub fn wants_remote(&self) -> bool {
        self.log_to_remote || self.log_to_remote_async
    }

    /// Remote endpoint for `program`, honoring the URL and token overrides
    pub fn remote_config(&self, program: &str) -> RemoteConfig {
        let token = self
            .log_collector_token
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTOR_TOKEN);
        let config = RemoteConfig::collector(token, program)
            .with_timeout(Duration::from_millis(self.log_remote_timeout_ms));

        match &self.log_collector_url {
            Some(url) => config.with_endpoint(url.clone()),
            None => config,
        }
    }

    /// Build a logger configured by these flags.
    ///
    /// When both remote flags are given, detached delivery wins; records are
    /// still posted once.
    pub fn build_logger(&self, app: &str) -> Result<Logger> {
        if !self.log_time_threshold.is_finite() {
            return Err(LoggerError::config(
                "log-time-threshold",
                format!("{} is not a finite number", self.log_time_threshold),
            ));
        }

        let mut logger = Logger::new(app, self.log_env.clone(), self.threshold());
        logger.set_time_track_threshold(self.log_time_threshold);
        logger.set_remote_config(self.remote_config(&ProcessInfo::current().program))?;

        if self.log_to_stderr {
            logger.set_sink("stderr")?;
        }
        if self.log_to_stdout {
            logger.set_sink("stdout")?;
        }
        if self.wants_remote() {
            logger.set_sink("remote")?;
        }
        if self.log_to_remote_async {
            logger.set_remote_delivery(RemoteDelivery::Detached)?;
        }

        tracing::debug!(logger = ?logger, "logger configured from flags");
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        log: LoggerFlags,
    }

    fn parse(args: &[&str]) -> LoggerFlags {
        let mut argv = vec!["svc"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().log
    }

    #[test]
    fn test_defaults() {
        let flags = parse(&[]);
        assert_eq!(flags, LoggerFlags::default());
        assert_eq!(flags.threshold(), Severity::Info);
        assert_eq!(flags.log_env, "development");
        assert!(!flags.wants_remote());
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(parse(&["--log-level", "0"]).threshold(), Severity::Debug);
        assert_eq!(parse(&["--log-level", "3"]).threshold(), Severity::Error);
        assert_eq!(parse(&["--log-level", "9"]).threshold(), Severity::Info);
        assert_eq!(parse(&["--log-level", "-2"]).threshold(), Severity::Info);
        assert_eq!(parse(&["--log-level", "300"]).threshold(), Severity::Info);
    }

    #[test]
    fn test_remote_config() {
        let flags = parse(&["--log-collector-token", "abc", "--log-remote-timeout-ms", "250"]);
        let config = flags.remote_config("svc");
        assert_eq!(config.endpoint, "https://logs-01.loggly.com/inputs/abc/tag/svc");
        assert_eq!(config.timeout, Duration::from_millis(250));

        let flags = parse(&["--log-collector-url", "http://127.0.0.1:9/in"]);
        assert_eq!(flags.remote_config("svc").endpoint, "http://127.0.0.1:9/in");
    }

    #[test]
    fn test_build_logger_installs_sinks() {
        let logger = parse(&["--log-to-stderr", "--log-to-stdout", "--log-level", "2"])
            .build_logger("svc")
            .unwrap();
        assert_eq!(logger.sink_names().collect::<Vec<_>>(), vec!["stderr", "stdout"]);
        assert_eq!(logger.level(), Severity::Warning);
        assert_eq!(logger.app(), "svc");
    }

    #[test]
    fn test_both_remote_flags_prefer_detached() {
        let mut logger = parse(&[
            "--log-to-remote",
            "--log-to-remote-async",
            "--log-collector-url",
            "http://127.0.0.1:9/in",
        ])
        .build_logger("svc")
        .unwrap();
        assert_eq!(logger.sink_names().collect::<Vec<_>>(), vec!["remote"]);
        assert_eq!(logger.remote_delivery(), RemoteDelivery::Detached);
        assert!(logger.shutdown(Duration::from_secs(1)));
    }

    #[test]
    fn test_rejects_non_finite_time_threshold() {
        let flags = LoggerFlags {
            log_time_threshold: f64::NAN,
            ..LoggerFlags::default()
        };
        assert!(matches!(
            flags.build_logger("svc"),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
