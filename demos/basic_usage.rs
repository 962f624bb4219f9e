//! Basic usage example
//!
//! Demonstrates tag routing through the global registry, level rules and
//! the call-site macros.
//!
//! Run with: cargo run --example basic_usage

use simplelog::{api, declare_tag, slog_debug, slog_error, slog_info, slog_warning, LogLevel};

declare_tag!(NETWORK, "Network");
declare_tag!(STORAGE, "Storage");

fn main() {
    println!("=== simplelog - Basic Usage Example ===\n");

    // Programmatic routing; a simplelog.ini next to the binary would be read too
    api::add_sink("Console", "Stdout", "color");
    api::add_sink("Errors", "Stderr", "");
    api::set_default_sinks("Console");
    api::set_default_level(LogLevel::Info);

    println!("1. Logging at different levels (default level INFO):");
    slog_error!(NETWORK, "Connection to {} refused", "10.0.0.7");
    slog_warning!(NETWORK, "Retry {} of {}", 1, 3);
    slog_info!(NETWORK, "Connected");
    slog_debug!(NETWORK, "Debug message (hidden)");

    println!("\n2. A tag with explicit sinks:");
    let audit = api::create_engine("Audit", "Console,Errors");
    audit.warning("Written to stdout and stderr");

    println!("\n3. Another tag, same shared console sink:");
    slog_info!(STORAGE, "Mounted {} volumes", 2);

    api::flush_all();
    println!("\n=== Example completed successfully! ===");
}
