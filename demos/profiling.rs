//! Profiling example
//!
//! Demonstrates namespaced loggers, per-level layouts, timer marks and the
//! buffered silent mode.
//!
//! Run with: cargo run --example profiling

use rust_console_logger::prelude::*;
use rust_console_logger::{disable, enable, flush, info, warn};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Console Logger - Profiling Example ===\n");

    let app = Logger::builder("app")
        .enabled(true)
        .level(LogLevel::Warn, LevelConfig::new().label("WARN").style("label", "yellow.bold"))
        .level(LogLevel::Error, LevelConfig::new().label("ERROR").style("label", "bgRed.white"))
        .token("pid", std::process::id().to_string())
        .layout("%d{HH:mm:ss.sss} {name} [{pid}] {label} {msg} +{duration}")
        .build()?;

    println!("1. Timing between calls:");
    app.mark();
    thread::sleep(Duration::from_millis(15));
    info!(app, "loaded %d records from %s", 120, "cache");
    thread::sleep(Duration::from_millis(5));
    warn!(app, "slow query: %j", LogValue::from_serialize(&[("table", "users")]));
    app.error(LogValue::error("connection reset"), &[]);

    println!("\n2. Namespace selection:");
    let db = Logger::builder("db:pool").enabled(true).build()?;
    disable("db:*");
    db.info("not shown", &[]);
    enable("db:*");
    db.info("pool ready with %d connections", &[8.into()]);

    println!("\n3. Silent mode:");
    let worker_a = Logger::builder("worker:a")
        .enabled(true)
        .silent(true)
        .flush_order_by(FlushOrder::Time)
        .build()?;
    let worker_b = Logger::builder("worker:b").enabled(true).silent(true).build()?;

    for i in 0..3 {
        worker_b.info("job %d picked up", &[i.into()]);
        worker_a.info("job %d finished", &[i.into()]);
    }
    println!("   buffered for worker:a: {} lines", worker_a.peek().lines().count());

    println!("   flushed by namespace:");
    flush(FlushOptions::new().order_by(FlushOrder::Name));

    println!("\n=== Example completed successfully ===");
    Ok(())
}
