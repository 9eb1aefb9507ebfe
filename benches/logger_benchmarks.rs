//! Criterion benchmarks for fanout_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanout_logger::core::{format_header, RemoteRecord};
use fanout_logger::prelude::*;
use fanout_logger::{LogEvent, MemoryBuffer, SharedWriter, Transport};
use serde_json::{json, Map};
use std::sync::Arc;

struct NullTransport;

impl Transport for NullTransport {
    fn post(&self, _url: &str, body: &str) -> Result<()> {
        black_box(body);
        Ok(())
    }
}

fn console_logger(level: Severity) -> (Logger, MemoryBuffer) {
    let buffer = MemoryBuffer::new();
    let mut logger = Logger::new("bench", "production", level);
    logger.install_sink(
        "stdout",
        Arc::new(ConsoleSink::with_writer("stdout", SharedWriter::memory(&buffer))),
    );
    (logger, buffer)
}

// ============================================================================
// Threshold Benchmarks
// ============================================================================

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered");
    group.throughput(Throughput::Elements(1));

    let (logger, _buffer) = console_logger(Severity::Error);

    group.bench_function("debug_plain", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("debug_formatted", |b| {
        b.iter(|| logger.debugf(format_args!("value {}", black_box(42))));
    });

    group.finish();
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let event = LogEvent::new(
        Severity::Info,
        args!["request", 17, "took", 12.5],
        CallSite::new("src/server.rs", 88, "handle"),
    )
    .with_labels("production", "bench", "web1");

    group.bench_function("header", |b| {
        b.iter(|| {
            format_header(
                black_box(event.severity),
                event.pid,
                &event.timestamp,
                &event.call_site,
            )
        });
    });

    group.bench_function("remote_record", |b| {
        b.iter(|| {
            RemoteRecord::build(black_box(&event))
                .and_then(|r| r.to_json())
                .map(|json| json.len())
        });
    });

    let mut mapping = Map::new();
    mapping.insert("user".into(), json!("u-1"));
    mapping.insert("latency_ms".into(), json!(12.5));
    let mapped = LogEvent::new(Severity::Info, mapping, CallSite::unknown());

    group.bench_function("remote_record_mapping", |b| {
        b.iter(|| RemoteRecord::build(black_box(&mapped)).and_then(|r| r.to_json()));
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let (logger, buffer) = console_logger(Severity::Debug);
    group.bench_function("console", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
            buffer.clear();
        });
    });

    let (mut fanout, fanout_buffer) = console_logger(Severity::Debug);
    fanout.install_sink(
        "remote",
        Arc::new(RemoteSink::with_transport(
            &RemoteConfig::collector("token", "bench"),
            Arc::new(NullTransport),
            SharedWriter::memory(&MemoryBuffer::new()),
        )),
    );
    group.bench_function("console_and_remote", |b| {
        b.iter(|| {
            fanout.info(args![black_box("user"), 42]);
            fanout_buffer.clear();
        });
    });

    let mut detached = Logger::builder()
        .environment("production")
        .detached_queue(65_536, 2)
        .overflow_policy(OverflowPolicy::DropNewest)
        .custom_sink(
            "remote",
            Arc::new(RemoteSink::with_transport(
                &RemoteConfig::collector("token", "bench"),
                Arc::new(NullTransport),
                SharedWriter::memory(&MemoryBuffer::new()),
            )),
        )
        .remote_delivery(RemoteDelivery::Detached)
        .build()
        .expect("detached logger");
    group.bench_function("detached_remote", |b| {
        b.iter(|| detached.info(black_box("queued")));
    });
    detached.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    group.finish();
}

criterion_group!(benches, bench_filtered, bench_formatting, bench_dispatch);
criterion_main!(benches);
