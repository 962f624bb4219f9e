//! Async logging example
//!
//! Demonstrates asynchronous engines loaded from an INI configuration, with
//! several producer threads writing to a shared file sink.
//!
//! Run with: cargo run --example async_logging

use simplelog::prelude::*;
use std::sync::Arc;
use std::thread;

const CONFIG: &str = "\
[general]
async = true
queue_size = 1024

[loggers]
Console = Stdout
Disk = File:async_test.log

[levels]
* = info,Console,Disk
Worker = debug,Disk
";

fn main() -> Result<()> {
    println!("=== simplelog - Async Logging Example ===\n");

    let config_path = std::env::temp_dir().join("simplelog-async-demo.ini");
    std::fs::write(&config_path, CONFIG)?;

    let registry = Arc::new(Registry::isolated());
    registry.set_config_path(&config_path);

    println!("1. High-throughput async logging:");
    let main_engine = registry.create_engine("Main", "");
    for i in 0..100 {
        main_engine.info(format!("Message #{}", i));
    }
    main_engine.flush();
    println!("   Logged 100 messages asynchronously");

    println!("\n2. Multi-threaded logging:");
    let mut handles = vec![];
    for thread_id in 0..5 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let worker = registry.create_engine("Worker", "");
            for i in 0..20 {
                worker.debug(format!("Thread {} - Message {}", thread_id, i));
            }
        }));
    }
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("a worker thread panicked");
        }
    }
    registry.flush_all();
    println!("   5 threads logged 20 messages each");

    let metrics = registry.create_engine("Worker", "").metrics().clone();
    println!(
        "\n3. Worker metrics: delivered={}, dropped={}, drop rate={:.2}%",
        metrics.delivered_count(),
        metrics.dropped_count(),
        metrics.drop_rate()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");

    Ok(())
}
