//! Main logger implementation

use super::{
    call_site::CallSite,
    dispatch::{deliver, report_failure, DetachedConfig, DetachedDispatcher, DEFAULT_SHUTDOWN_TIMEOUT},
    environment::EnvironmentPolicy,
    error::{LoggerError, Result},
    event::LogEvent,
    message::Message,
    metrics::DispatchMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    severity::Severity,
    sink::{Sink, SinkKind, SinkName, SinkPayload},
    timestamp::{system_clock, Clock},
    writer::SharedWriter,
};
use crate::process::ProcessInfo;
use crate::sinks::{ConsoleSink, RemoteConfig, RemoteSink};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default minimum elapsed time, in milliseconds, for `time_track` to log
pub const DEFAULT_TIME_TRACK_THRESHOLD_MS: f64 = 50.0;

/// How long `fatal` waits for detached deliveries before exiting
pub const FATAL_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// How remote sinks are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteDelivery {
    /// The logging call waits for the remote sink to finish
    #[default]
    Synchronous,
    /// The delivery is queued and the logging call returns immediately
    Detached,
}

pub struct Logger {
    host: String,
    app: String,
    env: String,
    pid: u32,
    level: Severity,
    sinks: BTreeMap<String, Arc<dyn Sink>>,
    remote_delivery: RemoteDelivery,
    remote_config: RemoteConfig,
    detached_config: DetachedConfig,
    detached: Option<DetachedDispatcher>,
    errors: SharedWriter,
    /// Whether the sink under `remote` was built from `remote_config`
    builtin_remote: bool,
    metrics: Arc<DispatchMetrics>,
    clock: Clock,
    console_colors: bool,
    time_track_threshold_ms: f64,
}

impl Logger {
    /// Create a logger with no sinks installed.
    ///
    /// An empty `app_name` falls back to the program name.
    pub fn new(app_name: impl Into<String>, env: impl Into<String>, level: Severity) -> Self {
        let process = ProcessInfo::current();
        let app = app_name.into();
        let app = if app.is_empty() {
            process.program.clone()
        } else {
            app
        };

        Self {
            host: process.host.clone(),
            app,
            env: env.into(),
            pid: process.pid,
            level,
            sinks: BTreeMap::new(),
            remote_delivery: RemoteDelivery::default(),
            remote_config: RemoteConfig::default(),
            detached_config: DetachedConfig::default(),
            detached: None,
            errors: SharedWriter::stderr(),
            builtin_remote: false,
            metrics: Arc::new(DispatchMetrics::new()),
            clock: system_clock,
            console_colors: false,
            time_track_threshold_ms: DEFAULT_TIME_TRACK_THRESHOLD_MS,
        }
    }

    /// Install the built-in sink for `name`, replacing any sink under the same key.
    ///
    /// Recognized names are `stderr`, `stdout` and `remote`, plus the aliases
    /// `console` and `loggly`. `file` and unknown names are accepted and
    /// ignored.
    pub fn set_sink(&mut self, name: &str) -> Result<()> {
        let Some(sink_name) = SinkName::parse(name) else {
            tracing::debug!(name, "ignoring unknown sink name");
            return Ok(());
        };

        let sink: Arc<dyn Sink> = match sink_name {
            SinkName::Stderr => Arc::new(ConsoleSink::stderr().with_colors(self.console_colors)),
            SinkName::Stdout => Arc::new(ConsoleSink::stdout().with_colors(self.console_colors)),
            SinkName::Remote => Arc::new(RemoteSink::new(&self.remote_config, self.errors.clone())?),
            SinkName::File => {
                tracing::debug!("file sink is not provided; ignoring");
                return Ok(());
            }
        };

        self.install_sink(sink_name.key(), sink);
        if sink_name == SinkName::Remote {
            self.builtin_remote = true;
        }
        Ok(())
    }

    /// Install a sink under `name`, replacing any sink with the same key
    pub fn install_sink(&mut self, name: impl Into<String>, sink: Arc<dyn Sink>) {
        let name = name.into();
        tracing::debug!(sink = %name, kind = ?sink.kind(), "installing sink");
        if name == SinkName::Remote.key() {
            self.builtin_remote = false;
        }
        self.sinks.insert(name, sink);
    }

    pub fn remove_sink(&mut self, name: &str) -> Option<Arc<dyn Sink>> {
        if name == SinkName::Remote.key() {
            self.builtin_remote = false;
        }
        self.sinks.remove(name)
    }

    pub fn sink_names(&self) -> impl Iterator<Item = &str> {
        self.sinks.keys().map(String::as_str)
    }

    pub fn has_sink(&self, name: &str) -> bool {
        self.sinks.contains_key(name)
    }

    fn has_remote_sink(&self) -> bool {
        self.sinks.values().any(|s| s.kind() == SinkKind::Remote)
    }

    pub fn set_level(&mut self, level: Severity) {
        self.level = level;
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Change the environment label. Takes effect on the next log call.
    pub fn set_environment(&mut self, env: impl Into<String>) {
        self.env = env.into();
    }

    pub fn environment(&self) -> &str {
        &self.env
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Replace the remote configuration.
    ///
    /// A built-in remote sink installed through [`set_sink`](Self::set_sink)
    /// is rebuilt with the new configuration. A custom sink installed under
    /// `remote` is left alone.
    pub fn set_remote_config(&mut self, config: RemoteConfig) -> Result<()> {
        self.remote_config = config;
        if self.builtin_remote {
            self.set_sink(SinkName::Remote.key())?;
        }
        Ok(())
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.remote_config
    }

    /// Replace the set of environments allowed to transmit remotely
    pub fn set_environment_policy(&mut self, policy: EnvironmentPolicy) -> Result<()> {
        let config = self.remote_config.clone().with_policy(policy);
        self.set_remote_config(config)
    }

    /// Choose synchronous or detached remote delivery.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConfiguration` when no remote sink is installed, or
    /// when the detached worker pool cannot be started.
    pub fn set_remote_delivery(&mut self, mode: RemoteDelivery) -> Result<()> {
        if !self.has_remote_sink() {
            return Err(LoggerError::config(
                "remote delivery",
                "no remote sink is installed",
            ));
        }

        if mode == RemoteDelivery::Detached && self.detached.is_none() {
            self.detached = Some(DetachedDispatcher::start(
                self.detached_config.clone(),
                Arc::clone(&self.metrics),
                self.errors.clone(),
            )?);
        }

        self.remote_delivery = mode;
        Ok(())
    }

    pub fn remote_delivery(&self) -> RemoteDelivery {
        self.remote_delivery
    }

    /// Sizing and overflow behaviour for the detached pool.
    ///
    /// Applies when detached delivery is next started.
    pub fn set_detached_config(&mut self, config: DetachedConfig) {
        self.detached_config = config;
    }

    pub fn set_time_track_threshold(&mut self, threshold_ms: f64) {
        self.time_track_threshold_ms = threshold_ms;
    }

    pub fn time_track_threshold(&self) -> f64 {
        self.time_track_threshold_ms
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Colour console output by severity for console sinks installed afterwards
    pub fn set_console_colors(&mut self, use_colors: bool) {
        self.console_colors = use_colors;
    }

    /// Redirect the local error stream.
    ///
    /// Affects sinks and the detached pool created afterwards; configure it
    /// before installing sinks.
    pub fn set_error_stream(&mut self, errors: SharedWriter) {
        self.errors = errors;
    }

    pub fn error_stream(&self) -> &SharedWriter {
        &self.errors
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    #[inline]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.passes(self.level)
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<Message>) -> bool {
        self.log_at(severity, CallSite::caller(), message)
    }

    /// Log with an explicit call site. Returns whether the threshold accepted
    /// the event; delivery failures are reported on the error stream only.
    pub fn log_at<M: Into<Message>>(&self, severity: Severity, call_site: CallSite, message: M) -> bool {
        if !self.enabled(severity) {
            self.metrics.record_filtered();
            return false;
        }
        self.dispatch(severity, call_site.resolved(), message.into());
        true
    }

    /// Like [`log_at`](Self::log_at), formatting only once the threshold
    /// has accepted the event
    pub fn log_formatted_at(
        &self,
        severity: Severity,
        call_site: CallSite,
        args: fmt::Arguments<'_>,
    ) -> bool {
        if !self.enabled(severity) {
            self.metrics.record_filtered();
            return false;
        }
        self.dispatch(severity, call_site.resolved(), Message::Formatted(args.to_string()));
        true
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<Message>) -> bool {
        self.log_at(Severity::Debug, CallSite::caller(), message)
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<Message>) -> bool {
        self.log_at(Severity::Info, CallSite::caller(), message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<Message>) -> bool {
        self.log_at(Severity::Warning, CallSite::caller(), message)
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<Message>) -> bool {
        self.log_at(Severity::Error, CallSite::caller(), message)
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) -> bool {
        self.log_formatted_at(Severity::Debug, CallSite::caller(), args)
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) -> bool {
        self.log_formatted_at(Severity::Info, CallSite::caller(), args)
    }

    #[track_caller]
    pub fn warningf(&self, args: fmt::Arguments<'_>) -> bool {
        self.log_formatted_at(Severity::Warning, CallSite::caller(), args)
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> bool {
        self.log_formatted_at(Severity::Error, CallSite::caller(), args)
    }

    /// Log at error severity regardless of the threshold, then exit the
    /// process with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<Message>) -> ! {
        self.fatal_at(CallSite::caller(), message)
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal_at(CallSite::caller(), Message::Formatted(args.to_string()))
    }

    pub fn fatal_at<M: Into<Message>>(&self, call_site: CallSite, message: M) -> ! {
        self.dispatch(Severity::Error, call_site.resolved(), message.into());
        if let Some(dispatcher) = self.detached.as_ref() {
            dispatcher.drain(FATAL_DRAIN_TIMEOUT);
        }
        // Exiting anyway; flush errors were already reported
        let _ = self.flush();
        std::process::exit(1)
    }

    fn dispatch(&self, severity: Severity, call_site: CallSite, message: Message) {
        self.metrics.record_accepted();

        let event = LogEvent {
            severity,
            message,
            timestamp: (self.clock)(),
            call_site,
            env: self.env.clone(),
            app: self.app.clone(),
            host: self.host.clone(),
            pid: self.pid,
        };

        // Rendered at most once, on the first console sink
        let mut line: Option<String> = None;

        for sink in self.sinks.values() {
            match sink.kind() {
                SinkKind::Console => {
                    let line = line.get_or_insert_with(|| event.console_line());
                    deliver(
                        sink.as_ref(),
                        severity,
                        SinkPayload::Line(line),
                        &self.metrics,
                        &self.errors,
                    );
                }
                SinkKind::Remote => match (self.remote_delivery, self.detached.as_ref()) {
                    (RemoteDelivery::Detached, Some(dispatcher)) => {
                        dispatcher.submit(Arc::clone(sink), event.clone());
                    }
                    _ => {
                        deliver(
                            sink.as_ref(),
                            severity,
                            SinkPayload::Event(&event),
                            &self.metrics,
                            &self.errors,
                        );
                    }
                },
            }
        }
    }

    /// Log `{"time": {"name": name, "ms": elapsed}}` at info severity when
    /// more than the time-track threshold has passed since `start`.
    ///
    /// Returns whether an event was logged.
    #[track_caller]
    pub fn time_track(&self, start: Instant, name: impl Into<Value>) -> bool {
        self.time_track_at(CallSite::caller(), start, name.into())
    }

    /// Start a guard that calls [`time_track`](Self::time_track) when dropped
    ///
    /// ```
    /// use fanout_logger::{Logger, Severity};
    ///
    /// let logger = Logger::new("svc", "development", Severity::Info);
    /// {
    ///     let _timer = logger.start_time_track("load");
    ///     // work
    /// }
    /// ```
    #[track_caller]
    pub fn start_time_track(&self, name: impl Into<Value>) -> TimeTrack<'_> {
        TimeTrack {
            logger: self,
            name: Some(name.into()),
            start: Instant::now(),
            // Resolved now, while the caller's frame is still on the stack
            call_site: CallSite::caller().resolved(),
        }
    }

    fn time_track_at(&self, call_site: CallSite, start: Instant, name: Value) -> bool {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        if elapsed_ms <= self.time_track_threshold_ms {
            return false;
        }

        let mut time = Map::new();
        time.insert("time".to_string(), json!({ "name": name, "ms": elapsed_ms }));
        self.log_at(Severity::Info, call_site, time)
    }

    /// Flush every installed sink, returning the first failure
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks.values() {
            if let Err(e) = sink.flush() {
                report_failure(&self.errors, sink.name(), &e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stop detached delivery and flush sinks.
    ///
    /// Waits up to `timeout` for queued detached deliveries. Returns `true`
    /// if everything completed in time.
    ///
    /// **Note**: dropping the logger does the same with
    /// [`DEFAULT_SHUTDOWN_TIMEOUT`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fanout_logger::{Logger, RemoteDelivery, Severity};
    /// use std::time::Duration;
    ///
    /// let mut logger = Logger::new("svc", "production", Severity::Info);
    /// logger.set_sink("remote").unwrap();
    /// logger.set_remote_delivery(RemoteDelivery::Detached).unwrap();
    /// logger.info("Important message");
    ///
    /// if !logger.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: some remote deliveries were abandoned");
    /// }
    /// ```
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let mut clean = true;
        if let Some(mut dispatcher) = self.detached.take() {
            clean = dispatcher.shutdown(timeout);
            self.remote_delivery = RemoteDelivery::Synchronous;
        }

        if self.flush().is_err() {
            clean = false;
        }

        let dropped = self.metrics.detached_dropped();
        if dropped > 0 {
            report_failure(
                &self.errors,
                "detached",
                &LoggerError::other(format!(
                    "shut down with {} dropped deliveries",
                    dropped
                )),
            );
        }
        clean
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.detached.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("host", &self.host)
            .field("app", &self.app)
            .field("env", &self.env)
            .field("pid", &self.pid)
            .field("level", &self.level)
            .field("sinks", &self.sinks.keys().collect::<Vec<_>>())
            .field("remote_delivery", &self.remote_delivery)
            .field("remote_endpoint", &self.remote_config.endpoint)
            .field("time_track_threshold_ms", &self.time_track_threshold_ms)
            .finish()
    }
}

/// Logs elapsed time on drop; see [`Logger::start_time_track`]
pub struct TimeTrack<'a> {
    logger: &'a Logger,
    name: Option<Value>,
    start: Instant,
    call_site: CallSite,
}

impl TimeTrack<'_> {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimeTrack<'_> {
    fn drop(&mut self) {
        if let Some(name) = self.name.take() {
            self.logger.time_track_at(self.call_site, self.start, name);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use fanout_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .app("billing")
///     .environment("staging")
///     .level(Severity::Debug)
///     .sink("stdout")
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} remote deliveries dropped", count);
///     }))
///     .build()
///     .unwrap();
/// assert!(logger.has_sink("stdout"));
/// ```
pub struct LoggerBuilder {
    app: String,
    env: String,
    level: Severity,
    sink_names: Vec<String>,
    custom_sinks: Vec<(String, Arc<dyn Sink>)>,
    remote_config: Option<RemoteConfig>,
    remote_delivery: RemoteDelivery,
    detached_config: DetachedConfig,
    error_stream: Option<SharedWriter>,
    console_colors: bool,
    time_track_threshold_ms: f64,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            app: String::new(),
            env: crate::config::DEFAULT_ENVIRONMENT.to_string(),
            level: Severity::Info,
            sink_names: Vec::new(),
            custom_sinks: Vec::new(),
            remote_config: None,
            remote_delivery: RemoteDelivery::Synchronous,
            detached_config: DetachedConfig::default(),
            error_stream: None,
            console_colors: false,
            time_track_threshold_ms: DEFAULT_TIME_TRACK_THRESHOLD_MS,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    /// Set minimum severity
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Install a built-in sink by name (see [`Logger::set_sink`])
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, name: impl Into<String>) -> Self {
        self.sink_names.push(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn custom_sink(mut self, name: impl Into<String>, sink: Arc<dyn Sink>) -> Self {
        self.custom_sinks.push((name.into(), sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_config(mut self, config: RemoteConfig) -> Self {
        self.remote_config = Some(config);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_delivery(mut self, mode: RemoteDelivery) -> Self {
        self.remote_delivery = mode;
        self
    }

    /// Size the detached pool
    #[must_use = "builder methods return a new value"]
    pub fn detached_queue(mut self, capacity: usize, workers: usize) -> Self {
        self.detached_config.capacity = capacity;
        self.detached_config.workers = workers;
        self
    }

    /// Set the overflow policy for detached delivery
    ///
    /// Determines what happens when the detached queue is full.
    /// Default is `AlertAndDrop`.
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let builder = Logger::builder()
    ///     .detached_queue(100, 1)
    ///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)));
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.detached_config.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The parameter is the total count of dropped detached deliveries.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.detached_config.on_overflow = Some(callback);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_stream(mut self, errors: SharedWriter) -> Self {
        self.error_stream = Some(errors);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_colors(mut self, use_colors: bool) -> Self {
        self.console_colors = use_colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_track_threshold(mut self, threshold_ms: f64) -> Self {
        self.time_track_threshold_ms = threshold_ms;
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Fails if the remote sink cannot be created, or if detached delivery
    /// is requested without a remote sink.
    pub fn build(self) -> Result<Logger> {
        let mut logger = Logger::new(self.app, self.env, self.level);
        if let Some(errors) = self.error_stream {
            logger.set_error_stream(errors);
        }
        if let Some(config) = self.remote_config {
            logger.remote_config = config;
        }
        logger.set_detached_config(self.detached_config);
        logger.set_console_colors(self.console_colors);
        logger.set_time_track_threshold(self.time_track_threshold_ms);

        for name in &self.sink_names {
            logger.set_sink(name)?;
        }
        for (name, sink) in self.custom_sinks {
            logger.install_sink(name, sink);
        }

        if self.remote_delivery == RemoteDelivery::Detached {
            logger.set_remote_delivery(RemoteDelivery::Detached)?;
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
