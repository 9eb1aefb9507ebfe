//! Remote collector example
//!
//! Sends structured records to a collector, first synchronously and then on
//! the detached worker pool. Records from non-production environments are
//! diverted to stderr instead of being posted.
//!
//! Run with: cargo run --example remote_logging -- <collector-url>

use fanout_logger::prelude::*;
use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Fanout Logger - Remote Logging Example ===\n");

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080/inputs/apikey/tag/remote_logging".into());

    let mut logger = Logger::builder()
        .app("remote-logging")
        .environment("development")
        .sink("stderr")
        .remote_config(
            RemoteConfig::default()
                .with_endpoint(endpoint)
                .with_timeout(Duration::from_secs(2)),
        )
        .sink("remote")
        .on_overflow(Arc::new(|count| {
            eprintln!("ALERT: {} remote deliveries dropped", count);
        }))
        .build()?;

    println!("1. Development records are diverted locally:");
    logger.info("not posted");

    println!("\n2. Staging records are posted:");
    logger.set_environment("staging");
    let mut mapping = Map::new();
    mapping.insert("order".into(), json!(1042));
    mapping.insert("total".into(), json!(99.5));
    logger.info(mapping);

    println!("\n3. Detached delivery:");
    logger.set_remote_delivery(RemoteDelivery::Detached)?;
    for i in 0..10 {
        logger.infof(format_args!("batch item {}", i));
    }

    let clean = logger.shutdown(Duration::from_secs(5));
    println!(
        "\nShutdown clean: {} (delivered {}, failed {}, diverted {})",
        clean,
        logger.metrics().delivered(),
        logger.metrics().failed(),
        logger.metrics().diverted()
    );
    Ok(())
}
