//! Configuring the default logger from command-line flags
//!
//! Run with: cargo run --example flags -- --log-to-stderr --log-level 0
//!
//! Every flag can also be set through its environment variable, e.g.
//! `FANOUT_LOG_ENV=staging`.

use clap::Parser;
use fanout_logger::{args, global, LoggerFlags};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(about = "Demonstrates logger flags")]
struct Cli {
    #[command(flatten)]
    log: LoggerFlags,

    /// Number of work items to simulate
    #[arg(long, default_value_t = 3)]
    items: u32,
}

fn main() -> fanout_logger::Result<()> {
    let cli = Cli::parse();
    global::init_from_flags(&cli.log, "flags-demo")?;
    global::debug_logger();

    for item in 0..cli.items {
        let start = Instant::now();
        std::thread::sleep(Duration::from_millis(20));
        global::debug(args!["processing item", item]);
        global::time_track(start, format!("item-{}", item));
    }

    global::warningf(format_args!("finished {} items", cli.items));
    global::shutdown(Duration::from_secs(5));
    Ok(())
}
