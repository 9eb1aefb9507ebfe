//! Basic logger usage example
//!
//! Demonstrates console sinks, thresholds, positional and formatted messages.
//!
//! Run with: cargo run --example basic_usage

use fanout_logger::prelude::*;
use fanout_logger::{info, warning};
use std::collections::HashMap;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== Fanout Logger - Basic Usage Example ===\n");

    let mut logger = Logger::new("basic-usage", "development", Severity::Debug);
    logger.set_console_colors(true);
    logger.set_sink("stdout")?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Positional and formatted messages:");
    logger.info(args!["request", 17, "took", 12.5, "ms"]);
    let mut fields = HashMap::new();
    fields.insert("user".to_string(), "u-42");
    logger.info(fields);
    logger.infof(format_args!("listening on port {}", 8080));
    info!(logger, "macro call from {}", "main");

    println!("\n3. Raising the threshold:");
    logger.set_level(Severity::Warning);
    println!("   Threshold set to WARNING - debug and info won't show:");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    warning!(logger, "Warning message (visible)");

    println!("\n4. Time tracking:");
    logger.set_level(Severity::Info);
    logger.set_time_track_threshold(0.0);
    let start = Instant::now();
    std::thread::sleep(std::time::Duration::from_millis(5));
    logger.time_track(start, "sleep");

    println!("\n5. Logger state:");
    println!("{:#?}", logger);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
