//! Bridge from the `log` facade
//!
//! Routes `log::info!` and friends into registry engines. Levels map as
//! `Error -> Error`, `Warn -> Warning`, `Info -> Info`, `Debug -> Debug`,
//! `Trace -> Verbose`.
//!
//! Targets are usually module paths, so the set of targets in a process is
//! open ended. A record goes to the engine of its full target when that
//! target has a rule of its own, else to the engine of the target's first
//! path segment (`hyper::client` -> `hyper`) when that has a rule, else to
//! one shared engine tagged [`BRIDGE_TAG`]. The number of engines the bridge
//! creates is therefore bounded by the configured rules.

use crate::api;
use crate::core::{LogLevel, LoggerError, Registry, Result, SourceLocation};
use log::{LevelFilter, Log, Metadata, Record};

/// Tag of the engine shared by every target without a rule
pub const BRIDGE_TAG: &str = "log";

pub fn map_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warning,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Verbose,
    }
}

pub struct LogBridge {
    registry: &'static Registry,
}

impl LogBridge {
    /// Bridge into the global registry
    pub fn new() -> Self {
        Self::with_registry(api::global())
    }

    pub fn with_registry(registry: &'static Registry) -> Self {
        Self { registry }
    }

    /// Tag whose engine receives records for `target`
    pub fn tag_for<'a>(&self, target: &'a str) -> &'a str {
        if self.registry.has_rule(target) {
            return target;
        }
        match target.split_once("::") {
            Some((krate, _)) if self.registry.has_rule(krate) => krate,
            _ => BRIDGE_TAG,
        }
    }
}

impl Default for LogBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        let tag = self.tag_for(metadata.target());
        map_level(metadata.level()).passes(self.registry.level_for(tag))
    }

    fn log(&self, record: &Record<'_>) {
        let engine = self.registry.create_engine(self.tag_for(record.target()), "");
        let level = map_level(record.level());
        if !engine.enabled(level) {
            return;
        }

        let location = SourceLocation::new(
            record.file_static().unwrap_or_default(),
            record.module_path_static().unwrap_or_default(),
            record.line().unwrap_or_default(),
        );
        engine.emit(level, location, *record.args());
    }

    fn flush(&self) {
        self.registry.flush_all();
    }
}

/// Install a [`LogBridge`] over the global registry as the `log` logger
pub fn init() -> Result<()> {
    log::set_boxed_logger(Box::new(LogBridge::new()))
        .map(|()| log::set_max_level(LevelFilter::Trace))
        .map_err(|e| LoggerError::other(format!("cannot install log bridge: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::consumer::test_support::CaptureSink;
    use crate::core::Sink;
    use std::sync::Arc;

    fn bridged_registry() -> (&'static Registry, Arc<CaptureSink>) {
        let registry: &'static Registry = Box::leak(Box::new(Registry::isolated()));
        let capture = Arc::new(CaptureSink::default());
        let handle = Arc::clone(&capture);
        registry.register_sink_type(
            "Capture",
            Arc::new(move |_: &str, _: &str| Arc::clone(&handle) as Arc<dyn Sink>),
        );
        registry.add_sink("Cap", "Capture", "");
        registry.set_formatter_name("Null");
        (registry, capture)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(map_level(log::Level::Error), LogLevel::Error);
        assert_eq!(map_level(log::Level::Warn), LogLevel::Warning);
        assert_eq!(map_level(log::Level::Info), LogLevel::Info);
        assert_eq!(map_level(log::Level::Debug), LogLevel::Debug);
        assert_eq!(map_level(log::Level::Trace), LogLevel::Verbose);
    }

    #[test]
    fn test_records_routed_by_target() {
        let (registry, capture) = bridged_registry();
        registry.apply_file_config(&crate::config::parse_str("[levels]\nQuiet = error\n"));
        let bridge = LogBridge::with_registry(registry);

        bridge.log(
            &Record::builder()
                .target("Network")
                .level(log::Level::Trace)
                .args(format_args!("handshake {}", 3))
                .build(),
        );
        bridge.log(
            &Record::builder()
                .target("Quiet")
                .level(log::Level::Warn)
                .args(format_args!("filtered"))
                .build(),
        );
        bridge.flush();

        assert_eq!(capture.lines(), vec!["handshake 3"]);
        assert_eq!(capture.records.lock()[0].0, LogLevel::Verbose);
        assert!(registry.engine(BRIDGE_TAG).is_some());
        assert!(registry.engine("Network").is_none());
        assert!(registry.engine("Quiet").is_some());
    }

    #[test]
    fn test_enabled_follows_rules_without_creating_engines() {
        let (registry, _capture) = bridged_registry();
        registry.apply_file_config(&crate::config::parse_str(
            "[levels]\n* = info\nQuiet = error\n",
        ));
        let bridge = LogBridge::with_registry(registry);

        let meta = |target, level| Metadata::builder().target(target).level(level).build();
        assert!(!bridge.enabled(&meta("Quiet", log::Level::Info)));
        assert!(bridge.enabled(&meta("Quiet", log::Level::Error)));
        assert!(bridge.enabled(&meta("quiet::inner", log::Level::Error)));
        assert!(bridge.enabled(&meta("other::module", log::Level::Info)));
        assert!(!bridge.enabled(&meta("other::module", log::Level::Debug)));
        assert_eq!(registry.engine_count(), 0);
    }

    #[test]
    fn test_targets_map_to_bounded_tags() {
        let (registry, capture) = bridged_registry();
        registry.apply_file_config(&crate::config::parse_str(
            "[levels]\nhyper = debug\nhyper::proto = error\n",
        ));
        registry.set_async_default(true);
        let bridge = LogBridge::with_registry(registry);

        assert_eq!(bridge.tag_for("hyper::proto"), "hyper::proto");
        assert_eq!(bridge.tag_for("hyper::client::pool"), "hyper");
        assert_eq!(bridge.tag_for("tokio::runtime"), BRIDGE_TAG);
        assert_eq!(bridge.tag_for("main"), BRIDGE_TAG);

        for i in 0..200 {
            let target = format!("dep{}::module", i);
            bridge.log(
                &Record::builder()
                    .target(&target)
                    .level(log::Level::Info)
                    .args(format_args!("from {}", i))
                    .build(),
            );
        }
        bridge.flush();

        assert_eq!(registry.engine_count(), 1);
        assert_eq!(capture.lines().len(), 200);
        assert_eq!(capture.lines()[199], "from 199");
    }
}
