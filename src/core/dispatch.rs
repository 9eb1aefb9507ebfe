//! Per-sink delivery and the detached delivery pool
//!
//! Every sink call goes through [`deliver`], which isolates the sink: an
//! error or a panic is counted and written to the local error stream, and
//! the caller carries on with the next sink.
//!
//! Detached remote deliveries are handed to [`DetachedDispatcher`], a bounded
//! queue drained by a small pool of worker threads. The logging call returns
//! as soon as the delivery is queued.

use super::{
    error::{LoggerError, Result},
    event::LogEvent,
    metrics::DispatchMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    severity::Severity,
    sink::{Outcome, Sink, SinkPayload},
    writer::SharedWriter,
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time allowed for detached deliveries to drain on shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

pub const DEFAULT_WORKERS: usize = 2;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Deliver one payload to one sink, containing any failure.
///
/// Returns `true` when the sink reported success.
pub fn deliver(
    sink: &dyn Sink,
    severity: Severity,
    payload: SinkPayload<'_>,
    metrics: &DispatchMetrics,
    errors: &SharedWriter,
) -> bool {
    let result = panic::catch_unwind(AssertUnwindSafe(|| sink.send(severity, payload)))
        .unwrap_or_else(|panic_info| {
            Err(LoggerError::sink_panicked(
                sink.name(),
                panic_message(panic_info.as_ref()),
            ))
        });

    match result {
        Ok(Outcome::Delivered) => {
            metrics.record_delivered();
            true
        }
        Ok(Outcome::Diverted) => {
            metrics.record_diverted();
            true
        }
        Ok(Outcome::Ignored) => true,
        Err(err) => {
            metrics.record_failed();
            report_failure(errors, sink.name(), &err);
            false
        }
    }
}

/// Write a failure line for `sink` to the local error stream.
///
/// Undelivered records are reproduced after the `]` so they are not lost.
pub fn report_failure(errors: &SharedWriter, sink: &str, err: &LoggerError) {
    let line = format!("E {}: {}", sink, err);
    let line = match err {
        LoggerError::Undelivered { .. } => line,
        _ => line + "] ",
    };
    if let Err(io_err) = errors.write_line(&line) {
        // Nowhere left to report to
        tracing::debug!(sink, error = %io_err, "failed to write delivery failure");
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Sizing and overflow behaviour of the detached pool
#[derive(Clone)]
pub struct DetachedConfig {
    pub capacity: usize,
    pub workers: usize,
    pub overflow_policy: OverflowPolicy,
    pub on_overflow: Option<OverflowCallback>,
}

impl Default for DetachedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
        }
    }
}

impl std::fmt::Debug for DetachedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetachedConfig")
            .field("capacity", &self.capacity)
            .field("workers", &self.workers)
            .field("overflow_policy", &self.overflow_policy)
            .field("on_overflow", &self.on_overflow.is_some())
            .finish()
    }
}

struct DetachedJob {
    sink: Arc<dyn Sink>,
    event: LogEvent,
}

pub struct DetachedDispatcher {
    sender: Option<Sender<DetachedJob>>,
    workers: Vec<thread::JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: Arc<DispatchMetrics>,
    errors: SharedWriter,
}

impl DetachedDispatcher {
    /// Spawn the worker pool
    pub fn start(
        config: DetachedConfig,
        metrics: Arc<DispatchMetrics>,
        errors: SharedWriter,
    ) -> Result<Self> {
        if config.capacity == 0 || config.workers == 0 {
            return Err(LoggerError::config(
                "detached dispatcher",
                "capacity and workers must be non-zero",
            ));
        }

        let (sender, receiver) = bounded(config.capacity);
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(config.workers);
        for idx in 0..config.workers {
            let receiver = receiver.clone();
            let in_flight = Arc::clone(&in_flight);
            let metrics = Arc::clone(&metrics);
            let errors = errors.clone();
            let handle = thread::Builder::new()
                .name(format!("fanout-detached-{}", idx))
                .spawn(move || Self::run_worker(receiver, in_flight, metrics, errors))
                .map_err(|e| LoggerError::io_operation("spawning detached worker", e))?;
            workers.push(handle);
        }

        tracing::debug!(
            capacity = config.capacity,
            workers = config.workers,
            policy = %config.overflow_policy,
            "detached dispatcher started"
        );

        Ok(Self {
            sender: Some(sender),
            workers,
            in_flight,
            capacity: config.capacity,
            overflow_policy: config.overflow_policy,
            on_overflow: config.on_overflow,
            metrics,
            errors,
        })
    }

    fn run_worker(
        receiver: Receiver<DetachedJob>,
        in_flight: Arc<AtomicUsize>,
        metrics: Arc<DispatchMetrics>,
        errors: SharedWriter,
    ) {
        // Exits once every sender is dropped and the queue is empty
        while let Ok(job) = receiver.recv() {
            deliver(
                job.sink.as_ref(),
                job.event.severity,
                SinkPayload::Event(&job.event),
                &metrics,
                &errors,
            );
            in_flight.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Queue a delivery. Never waits for the delivery itself; may wait for
    /// queue space when the overflow policy blocks.
    pub fn submit(&self, sink: Arc<dyn Sink>, event: LogEvent) {
        let Some(sender) = self.sender.as_ref() else {
            self.metrics.record_detached_dropped();
            return;
        };

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(DetachedJob { sink, event }) {
            Ok(()) => {
                self.metrics.record_detached_queued();
            }
            Err(TrySendError::Full(job)) => self.handle_overflow(sender, job),
            Err(TrySendError::Disconnected(_)) => {
                self.in_flight.fetch_sub(1, Ordering::AcqRel);
                self.metrics.record_detached_dropped();
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<DetachedJob>, job: DetachedJob) {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.in_flight.fetch_sub(1, Ordering::AcqRel);
                self.metrics.record_detached_dropped();
            }

            OverflowPolicy::Block => {
                self.metrics.record_block();
                match sender.send(job) {
                    Ok(()) => {
                        self.metrics.record_detached_queued();
                    }
                    Err(_) => {
                        self.in_flight.fetch_sub(1, Ordering::AcqRel);
                        self.metrics.record_detached_dropped();
                    }
                }
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match sender.send_timeout(job, *timeout) {
                    Ok(()) => {
                        self.metrics.record_detached_queued();
                    }
                    Err(SendTimeoutError::Timeout(_)) => self.alert_and_drop(),
                    Err(SendTimeoutError::Disconnected(_)) => {
                        self.in_flight.fetch_sub(1, Ordering::AcqRel);
                        self.metrics.record_detached_dropped();
                    }
                }
            }

            OverflowPolicy::AlertAndDrop => self.alert_and_drop(),
        }
    }

    fn alert_and_drop(&self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        let dropped_count = self.metrics.record_detached_dropped();

        // Alert on first drop and every 1000th thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;
        if !should_alert {
            return;
        }

        report_failure(
            &self.errors,
            "detached",
            &LoggerError::queue_full(self.capacity, self.capacity),
        );
        if let Some(ref callback) = self.on_overflow {
            callback(dropped_count + 1);
        }
    }

    /// Deliveries queued or currently being delivered
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Wait until every queued delivery has completed, bounded by `timeout`.
    ///
    /// Returns `false` if deliveries were still pending when time ran out.
    pub fn drain(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.pending() > 0 {
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
        true
    }

    /// Close the queue and wait for workers to finish, bounded by `timeout`.
    ///
    /// Returns `true` if every worker exited within the timeout. Deliveries
    /// still pending after the timeout are abandoned.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());

        let start = Instant::now();
        let mut clean = true;
        for handle in self.workers.drain(..) {
            loop {
                if handle.is_finished() {
                    if handle.join().is_err() {
                        tracing::debug!("detached worker panicked during shutdown");
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    clean = false;
                    break;
                }

                thread::sleep(POLL_INTERVAL);
            }
        }

        if !clean {
            report_failure(
                &self.errors,
                "detached",
                &LoggerError::other(format!(
                    "shutdown timed out with {} deliveries pending",
                    self.pending()
                )),
            );
        }
        tracing::debug!(clean, "detached dispatcher stopped");
        clean
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }
}

impl Drop for DetachedDispatcher {
    fn drop(&mut self) {
        if self.is_running() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}
