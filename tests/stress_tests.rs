//! Stress tests for concurrent dispatch
//!
//! These tests verify:
//! - Console lines never interleave under concurrent writers
//! - Detached delivery accounts for every queued record under load
//! - Overflow policies drop instead of blocking when configured to

mod common;

use common::RecordingTransport;
use fanout_logger::prelude::*;
use fanout_logger::{MemoryBuffer, SharedWriter};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_concurrent_console_lines_stay_intact() {
    let buffer = MemoryBuffer::new();
    let mut logger = Logger::new("stress", "development", Severity::Info);
    logger.install_sink(
        "stdout",
        Arc::new(ConsoleSink::with_writer("stdout", SharedWriter::memory(&buffer))),
    );
    let logger = Arc::new(logger);

    let threads = 8;
    let per_thread = 250;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger.infof(format_args!("thread-{} message-{} payload-{}", t, i, "x".repeat(64)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread");
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), threads * per_thread);

    let mut seen = HashSet::new();
    for line in &lines {
        assert!(line.starts_with('I'), "corrupted line: {}", line);
        let (_, message) = line.split_once("] ").expect("header terminator");
        let mut parts = message.split(' ');
        let thread_part = parts.next().expect("thread");
        let message_part = parts.next().expect("message");
        let payload_part = parts.next().expect("payload");
        assert!(parts.next().is_none(), "interleaved line: {}", line);
        assert_eq!(payload_part.len(), "payload-".len() + 64);
        assert!(seen.insert(format!("{} {}", thread_part, message_part)));
    }
}

#[test]
fn test_detached_delivers_everything_with_blocking_policy() {
    let transport = Arc::new(RecordingTransport::slow(Duration::from_millis(1)));
    let mut logger = Logger::builder()
        .app("stress")
        .environment("production")
        .detached_queue(16, 4)
        .overflow_policy(OverflowPolicy::Block)
        .custom_sink(
            "remote",
            Arc::new(RemoteSink::with_transport(
                &RemoteConfig::collector("token", "stress"),
                transport.clone(),
                SharedWriter::memory(&MemoryBuffer::new()),
            )),
        )
        .remote_delivery(RemoteDelivery::Detached)
        .build()
        .expect("logger");

    let logger_ref = &logger;
    thread::scope(|scope| {
        for t in 0..4 {
            scope.spawn(move || {
                for i in 0..50 {
                    logger_ref.info(args!["record", t, i]);
                }
            });
        }
    });

    assert!(logger.shutdown(Duration::from_secs(10)));
    assert_eq!(transport.bodies().len(), 200);
    assert_eq!(logger.metrics().detached_dropped(), 0);
    assert_eq!(logger.metrics().delivered(), 200);
}

#[test]
fn test_drop_newest_never_blocks_caller() {
    let transport = Arc::new(RecordingTransport::slow(Duration::from_millis(20)));
    let logger = Logger::builder()
        .environment("production")
        .detached_queue(2, 1)
        .overflow_policy(OverflowPolicy::DropNewest)
        .custom_sink(
            "remote",
            Arc::new(RemoteSink::with_transport(
                &RemoteConfig::collector("token", "stress"),
                transport.clone(),
                SharedWriter::memory(&MemoryBuffer::new()),
            )),
        )
        .remote_delivery(RemoteDelivery::Detached)
        .build()
        .expect("logger");

    let start = Instant::now();
    for i in 0..100 {
        logger.info(i);
    }
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(logger.metrics().detached_dropped() > 0);
    assert!(logger.metrics().queue_full_events() > 0);
}
