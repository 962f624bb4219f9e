//! Factory registrations, opened sinks and the per-tag engine cache
//!
//! A [`Registry`] turns the routing [`Config`] into engines. Sink types and
//! formatters are looked up by name in factory tables filled by explicit
//! registration calls ([`Registry::register_builtins`] for the bundled ones).
//!
//! The first engine request runs a one-time initialisation that loads the
//! first readable config file out of:
//!
//! 1. the path given to [`Registry::set_config_path`]
//! 2. the `SIMPLELOG_CONFIG_INI` environment variable
//! 3. `SIMPLELOG_DEFAULT_CONFIG`, captured at compile time
//! 4. `./simplelog.ini`
//! 5. `~/.simplelog.ini`
//! 6. `/etc/simplelog.ini`
//!
//! Registries built with [`Registry::new`] or [`Registry::isolated`] only
//! consult the first entry.

use super::{
    engine::Engine,
    error::{LoggerError, Result},
    formatter::{Formatter, FormatterFactory},
    log_level::LogLevel,
    sink::{Sink, SinkFactory},
};
use crate::config::{CaseMap, Config, Sections, DEFAULT_TAG};
use crate::formatters::{
    DefaultFormatter, NullFormatter, DEFAULT_FORMATTER_NAME, NULL_FORMATTER_NAME,
};
use crate::sinks::{
    ConsoleSink, ConsoleStream, FileSink, FILE_SINK_TYPE, STDERR_SINK_TYPE, STDOUT_SINK_TYPE,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_ENV_VAR: &str = "SIMPLELOG_CONFIG_INI";
pub const CONFIG_FILE_NAME: &str = "simplelog.ini";
const HOME_CONFIG_FILE_NAME: &str = ".simplelog.ini";
const SYSTEM_CONFIG_PATH: &str = "/etc/simplelog.ini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSearch {
    Standard,
    ExplicitOnly,
}

#[derive(Default)]
struct Factories {
    sinks: CaseMap<SinkFactory>,
    formatters: CaseMap<FormatterFactory>,
}

struct RegistryState {
    initialized: bool,
    config: Config,
    config_path: Option<PathBuf>,
    /// Opened sinks by sink name
    opened: CaseMap<Arc<dyn Sink>>,
    /// Opened sinks by lowercase type and address
    shared: HashMap<(String, String), Arc<dyn Sink>>,
    /// One formatter instance per factory name
    formatters: CaseMap<Arc<dyn Formatter>>,
    /// Engines by tag, case-sensitive
    engines: HashMap<String, Arc<Engine>>,
}

impl RegistryState {
    fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            initialized: false,
            config: Config::default(),
            config_path,
            opened: CaseMap::new(),
            shared: HashMap::new(),
            formatters: CaseMap::new(),
            engines: HashMap::new(),
        }
    }

    fn load_config(&mut self, path: &Path) -> bool {
        match self.config.load_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("[SIMPLELOG WARNING] Skipping configuration file: {}", e);
                false
            }
        }
    }

    fn formatter(&mut self, factories: &Factories, name: &str) -> Result<Arc<dyn Formatter>> {
        let (name, factory) = factories
            .formatters
            .get(name)
            .map(|factory| (name, factory))
            .or_else(|| factories.formatters.first())
            .ok_or(LoggerError::NoFormatter)?;

        if let Some(instance) = self.formatters.get(name) {
            return Ok(Arc::clone(instance));
        }
        let instance = factory();
        self.formatters.insert(name, Arc::clone(&instance));
        Ok(instance)
    }

    fn open_sink(
        &mut self,
        factories: &Factories,
        tag: &str,
        name: &str,
    ) -> Option<Arc<dyn Sink>> {
        if let Some(sink) = self.opened.get(name) {
            return Some(Arc::clone(sink));
        }

        let descriptor = self.config.sinks().get(name)?;
        let key = (
            descriptor.sink_type.to_ascii_lowercase(),
            descriptor.address.clone(),
        );

        let sink = match self.shared.get(&key) {
            Some(sink) => Arc::clone(sink),
            None => {
                let Some(factory) = factories.sinks.get(&descriptor.sink_type) else {
                    eprintln!(
                        "[SIMPLELOG WARNING] {}",
                        LoggerError::unknown_sink_type(name, descriptor.sink_type.as_str())
                    );
                    return None;
                };
                let sink = factory(tag, &descriptor.address);
                self.shared.insert(key, Arc::clone(&sink));
                sink
            }
        };

        self.opened.insert(name, Arc::clone(&sink));
        Some(sink)
    }

    /// Exactly `names` when non-empty, every configured sink otherwise.
    /// Unconfigured names and unknown types are skipped.
    fn open_sinks(
        &mut self,
        factories: &Factories,
        tag: &str,
        names: &[String],
    ) -> Vec<Arc<dyn Sink>> {
        let names: Vec<String> = if names.is_empty() {
            self.config.sinks().keys().map(str::to_string).collect()
        } else {
            names.to_vec()
        };

        names
            .iter()
            .filter_map(|name| self.open_sink(factories, tag, name))
            .collect()
    }
}

/// Owner of factories, configuration, opened sinks and engines
pub struct Registry {
    factories: RwLock<Factories>,
    state: Mutex<RegistryState>,
    search: ConfigSearch,
}

impl Registry {
    /// Registry without any factory and without implicit config file search
    pub fn new() -> Self {
        Self::with_search(ConfigSearch::ExplicitOnly)
    }

    /// Built-in factories plus the standard config file search
    pub fn with_builtins() -> Self {
        let registry = Self::with_search(ConfigSearch::Standard);
        registry.register_builtins();
        registry
    }

    /// Built-in factories; only an explicitly set config path is read
    pub fn isolated() -> Self {
        let registry = Self::new();
        registry.register_builtins();
        registry
    }

    fn with_search(search: ConfigSearch) -> Self {
        Self {
            factories: RwLock::new(Factories::default()),
            state: Mutex::new(RegistryState::new(None)),
            search,
        }
    }

    /// Register the bundled formatters (`Default`, `Null`) and sink types
    /// (`Stdout`, `Stderr`, `File`), in that order
    pub fn register_builtins(&self) {
        self.register_formatter(DEFAULT_FORMATTER_NAME, Arc::new(|| {
            Arc::new(DefaultFormatter::new()) as Arc<dyn Formatter>
        }));
        self.register_formatter(NULL_FORMATTER_NAME, Arc::new(|| {
            Arc::new(NullFormatter) as Arc<dyn Formatter>
        }));

        self.register_sink_type(STDOUT_SINK_TYPE, Arc::new(|_tag: &str, address: &str| {
            Arc::new(ConsoleSink::from_address(ConsoleStream::Stdout, address)) as Arc<dyn Sink>
        }));
        self.register_sink_type(STDERR_SINK_TYPE, Arc::new(|_tag: &str, address: &str| {
            Arc::new(ConsoleSink::from_address(ConsoleStream::Stderr, address)) as Arc<dyn Sink>
        }));
        self.register_sink_type(FILE_SINK_TYPE, Arc::new(|tag: &str, address: &str| {
            Arc::new(FileSink::from_address(tag, address)) as Arc<dyn Sink>
        }));
    }

    /// Register or replace the factory for a sink type
    pub fn register_sink_type(&self, type_name: &str, factory: SinkFactory) {
        self.factories.write().sinks.insert(type_name, factory);
    }

    /// Register or replace a formatter factory
    pub fn register_formatter(&self, name: &str, factory: FormatterFactory) {
        self.factories.write().formatters.insert(name, factory);
    }

    pub fn has_sink_type(&self, type_name: &str) -> bool {
        self.factories.read().sinks.contains_key(type_name)
    }

    pub fn has_formatter(&self, name: &str) -> bool {
        self.factories.read().formatters.contains_key(name)
    }

    /// Read config files at most once per registry lifetime (or per reset)
    fn initialize(&self, state: &mut RegistryState) {
        if state.initialized {
            return;
        }
        state.initialized = true;

        for path in self.config_candidates(state.config_path.as_deref()) {
            if state.load_config(&path) {
                break;
            }
        }
    }

    fn config_candidates(&self, explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = explicit.map(Path::to_path_buf).into_iter().collect();
        if self.search == ConfigSearch::ExplicitOnly {
            return candidates;
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            candidates.push(PathBuf::from(path));
        }
        if let Some(path) = option_env!("SIMPLELOG_DEFAULT_CONFIG").filter(|p| !p.is_empty()) {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from(CONFIG_FILE_NAME));
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(HOME_CONFIG_FILE_NAME));
        }
        candidates.push(PathBuf::from(SYSTEM_CONFIG_PATH));
        candidates
    }

    /// Engine for `tag`, created on first request
    ///
    /// `sink_names` is a comma separated list of configured sink names. When
    /// it names at least one known sink the engine writes to exactly those;
    /// otherwise it uses the sinks of the tag's rule, or every configured
    /// sink. Later requests for the same tag return the cached engine and
    /// ignore `sink_names`.
    ///
    /// # Example
    ///
    /// ```
    /// use simplelog::prelude::*;
    ///
    /// let registry = Registry::isolated();
    /// registry.add_sink("Console", "Stdout", "");
    /// registry.set_default_level(LogLevel::Info);
    ///
    /// let engine = registry.create_engine("Network", "");
    /// assert_eq!(engine.level(), LogLevel::Info);
    /// assert!(std::sync::Arc::ptr_eq(&engine, &registry.create_engine("Network", "Console")));
    /// ```
    pub fn create_engine(&self, tag: &str, sink_names: &str) -> Arc<Engine> {
        let mut guard = self.state.lock();
        if let Some(engine) = guard.engines.get(tag) {
            return Arc::clone(engine);
        }

        let state = &mut *guard;
        self.initialize(state);
        let factories = self.factories.read();

        let formatter_name = state.config.formatter_name().to_string();
        let formatter = state
            .formatter(&factories, &formatter_name)
            .unwrap_or_else(|e| {
                eprintln!("[SIMPLELOG WARNING] {}; tag '{}' writes bare messages", e, tag);
                Arc::new(NullFormatter) as Arc<dyn Formatter>
            });

        let rule = state.config.rule_for(tag).cloned();
        let explicit = state.config.split_sinks(sink_names);
        let names = if !explicit.is_empty() {
            explicit
        } else {
            rule.as_ref().map(|r| r.sinks.clone()).unwrap_or_default()
        };
        let sinks = state.open_sinks(&factories, tag, &names);
        let level = rule.map_or(LogLevel::Verbose, |r| r.level);

        let mut builder = Engine::builder(tag)
            .level(level)
            .formatter(formatter)
            .sinks(sinks);
        if state.config.is_async() {
            builder = builder.async_mode(state.config.queue_capacity());
        }

        let engine = Arc::new(builder.build());
        state.engines.insert(tag.to_string(), Arc::clone(&engine));
        engine
    }

    /// Already created engine for `tag`
    pub fn engine(&self, tag: &str) -> Option<Arc<Engine>> {
        self.state.lock().engines.get(tag).cloned()
    }

    pub fn engine_count(&self) -> usize {
        self.state.lock().engines.len()
    }

    /// Whether `tag` has a rule of its own; the `*` rule does not count
    pub fn has_rule(&self, tag: &str) -> bool {
        let mut state = self.state.lock();
        self.initialize(&mut state);
        tag != DEFAULT_TAG && state.config.rules().contains_key(tag)
    }

    /// Level an engine created for `tag` right now would filter at
    pub fn level_for(&self, tag: &str) -> LogLevel {
        let mut state = self.state.lock();
        self.initialize(&mut state);
        state
            .config
            .rule_for(tag)
            .map_or(LogLevel::Verbose, |rule| rule.level)
    }

    /// Shared formatter instance for `name`, else for the first registered
    /// formatter
    pub fn resolve_formatter(&self, name: &str) -> Result<Arc<dyn Formatter>> {
        let mut state = self.state.lock();
        let factories = self.factories.read();
        state.formatter(&factories, name)
    }

    /// Opened sinks for `names`, or every configured sink if `names` is empty
    pub fn resolve_sinks(&self, tag: &str, names: &[String]) -> Vec<Arc<dyn Sink>> {
        let mut state = self.state.lock();
        let factories = self.factories.read();
        state.open_sinks(&factories, tag, names)
    }

    /// Flush every engine created so far
    pub fn flush_all(&self) {
        let engines: Vec<Arc<Engine>> = self.state.lock().engines.values().cloned().collect();
        for engine in engines {
            engine.flush();
        }
    }

    pub fn add_sink(&self, name: &str, sink_type: &str, address: &str) {
        self.state.lock().config.add_sink(name, sink_type, address);
    }

    pub fn set_default_sinks(&self, names_csv: &str) {
        self.state.lock().config.set_default_sinks(names_csv);
    }

    pub fn set_default_level(&self, level: LogLevel) {
        self.state.lock().config.set_default_level(level);
    }

    pub fn set_async_default(&self, enabled: bool) {
        self.state.lock().config.set_async_default(enabled);
    }

    pub fn set_formatter_name(&self, name: &str) {
        self.state.lock().config.set_formatter_name(name);
    }

    pub fn set_queue_capacity(&self, capacity: usize) {
        self.state.lock().config.set_queue_capacity(capacity);
    }

    pub fn apply_file_config(&self, sections: &Sections) {
        self.state.lock().config.apply_file_config(sections);
    }

    /// Use `path` as the first config file candidate
    ///
    /// If engines were already requested the file is applied right away.
    pub fn set_config_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.state.lock();
        if state.initialized {
            state.load_config(&path);
        }
        state.config_path = Some(path);
    }

    /// Copy of the effective routing configuration
    pub fn config_snapshot(&self) -> Config {
        self.state.lock().config.clone()
    }

    /// Drop engines, opened sinks and formatter instances, restore the
    /// default configuration and re-arm config file loading. Factory
    /// registrations and the explicit config path are kept.
    pub fn reset(&self) {
        let engines = {
            let mut state = self.state.lock();
            let config_path = state.config_path.take();
            std::mem::replace(&mut *state, RegistryState::new(config_path)).engines
        };
        // Async workers are joined here, outside the lock
        drop(engines);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_str;
    use crate::core::consumer::test_support::CaptureSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Registry whose "Capture" sink type hands out fresh capture sinks
    /// and remembers them for inspection
    fn capture_registry() -> (Registry, Arc<Mutex<Vec<Arc<CaptureSink>>>>) {
        let registry = Registry::isolated();
        let created: Arc<Mutex<Vec<Arc<CaptureSink>>>> = Arc::new(Mutex::new(Vec::new()));
        let list = Arc::clone(&created);
        registry.register_sink_type(
            "Capture",
            Arc::new(move |_tag: &str, _address: &str| {
                let sink = Arc::new(CaptureSink::default());
                list.lock().push(Arc::clone(&sink));
                sink as Arc<dyn Sink>
            }),
        );
        (registry, created)
    }

    #[test]
    fn test_builtins_registered() {
        let registry = Registry::isolated();
        for sink_type in ["stdout", "STDERR", "File"] {
            assert!(registry.has_sink_type(sink_type));
        }
        assert!(registry.has_formatter("default"));
        assert!(registry.has_formatter("Null"));

        let empty = Registry::new();
        assert!(!empty.has_sink_type("Stdout"));
        assert!(!empty.has_formatter("Default"));
    }

    #[test]
    fn test_resolve_formatter_shares_instances() {
        let registry = Registry::isolated();
        let a = registry.resolve_formatter("Null").expect("null formatter");
        let b = registry.resolve_formatter("NULL").expect("null formatter");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "Null");

        let fallback = registry.resolve_formatter("Unknown").expect("fallback formatter");
        assert_eq!(fallback.name(), "Default");

        assert!(matches!(
            Registry::new().resolve_formatter("Default"),
            Err(LoggerError::NoFormatter)
        ));
    }

    #[test]
    fn test_engine_without_formatter_factories_writes_bare_messages() {
        let registry = Registry::new();
        let capture = Arc::new(CaptureSink::default());
        let handle = Arc::clone(&capture);
        registry.register_sink_type(
            "Capture",
            Arc::new(move |_: &str, _: &str| Arc::clone(&handle) as Arc<dyn Sink>),
        );
        registry.add_sink("Out", "Capture", "");

        let engine = registry.create_engine("Bare", "");
        engine.info("just the text");

        assert_eq!(engine.formatter_name(), "Null");
        assert_eq!(capture.lines(), vec!["just the text"]);
    }

    #[test]
    fn test_added_sink_resolves_for_unruled_tag() {
        let (registry, created) = capture_registry();
        registry.add_sink("X", "Capture", "");

        let sinks = registry.resolve_sinks("Unruled", &[]);
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].name(), "Capture");
        assert_eq!(created.lock().len(), 1);
    }

    #[test]
    fn test_create_engine_is_idempotent() {
        let (registry, created) = capture_registry();
        registry.add_sink("A", "Capture", "a");
        registry.add_sink("B", "Capture", "b");

        let first = registry.create_engine("Network", "A");
        let second = registry.create_engine("Network", "B");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.sink_count(), 1);
        assert_eq!(registry.engine_count(), 1);
        assert_eq!(created.lock().len(), 1);

        // Tags are case-sensitive
        let other = registry.create_engine("network", "B");
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn test_sink_selection_order() {
        let (registry, _created) = capture_registry();
        registry.add_sink("A", "Capture", "a");
        registry.add_sink("B", "Capture", "b");
        registry.add_sink("C", "Capture", "c");
        registry.apply_file_config(&parse_str("[levels]\nRuled = warning,B\n"));

        // explicit names win over the rule
        assert_eq!(registry.create_engine("Ruled", "C,nope").sink_count(), 1);
        // rule sinks
        let ruled = registry.create_engine("Ruled2", "");
        assert_eq!(ruled.sink_count(), 3);
        let ruled_b = registry.create_engine("RULED", "");
        assert_eq!(ruled_b.sink_count(), 1);
        assert_eq!(ruled_b.level(), LogLevel::Warning);
        // unknown explicit names only: fall through to every sink
        let fallback = registry.create_engine("Loose", "missing");
        assert_eq!(fallback.sink_count(), 3);
        assert_eq!(fallback.level(), LogLevel::Verbose);
    }

    #[test]
    fn test_sinks_shared_across_tags() {
        let (registry, created) = capture_registry();
        registry.add_sink("Main", "Capture", "shared");
        registry.add_sink("Alias", "capture", "shared");
        registry.add_sink("Own", "Capture", "own");

        let a = registry.create_engine("A", "Main");
        let b = registry.create_engine("B", "Main,Own");
        let c = registry.create_engine("C", "Alias");

        assert_eq!(created.lock().len(), 2);
        let main = Arc::clone(&a.sinks()[0]);
        assert!(b.shares_sink(&main));
        assert!(c.shares_sink(&main));
    }

    #[test]
    fn test_unknown_sink_type_skipped() {
        let (registry, _created) = capture_registry();
        registry.add_sink("Net", "Tcp", "127.0.0.5:1234");
        registry.add_sink("Cap", "Capture", "");

        let engine = registry.create_engine("Mixed", "");
        assert_eq!(engine.sink_count(), 1);
        assert!(registry.resolve_sinks("Mixed", &["Net".to_string()]).is_empty());
    }

    #[test]
    fn test_engine_routing_and_level() {
        let (registry, created) = capture_registry();
        registry.add_sink("Cap", "Capture", "");
        registry.set_default_level(LogLevel::Warning);
        registry.set_formatter_name("Null");

        let engine = registry.create_engine("Quiet", "");
        engine.error("kept");
        engine.info("dropped");
        engine.flush();

        let sink = Arc::clone(&created.lock()[0]);
        assert_eq!(sink.lines(), vec!["kept"]);
        assert_eq!(sink.flush_count(), 1);
    }

    #[test]
    fn test_rule_queries_do_not_create_engines() {
        let registry = Registry::isolated();
        registry.apply_file_config(&parse_str("[levels]\n* = warning\nNetwork = debug\n"));

        assert!(registry.has_rule("network"));
        assert!(!registry.has_rule("Other"));
        assert!(!registry.has_rule("*"));
        assert_eq!(registry.level_for("Network"), LogLevel::Debug);
        assert_eq!(registry.level_for("Other"), LogLevel::Warning);
        assert_eq!(registry.engine_count(), 0);
    }

    #[test]
    fn test_async_default_uses_queue_capacity() {
        let (registry, created) = capture_registry();
        registry.add_sink("Cap", "Capture", "");
        registry.set_async_default(true);
        registry.set_queue_capacity(32);
        registry.set_formatter_name("Null");

        let engine = registry.create_engine("Async", "");
        assert!(engine.is_async());
        for i in 0..10 {
            engine.info(format!("line {}", i));
        }
        registry.flush_all();

        assert_eq!(created.lock()[0].lines().len(), 10);
    }

    #[test]
    fn test_config_path_loaded_once_then_applied_live() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first.ini");
        let second = dir.path().join("second.ini");
        std::fs::write(&first, "[general]\nformatter = Null\n").expect("write");
        std::fs::write(&second, "[general]\nasync = 1\n").expect("write");

        let registry = Registry::isolated();
        registry.set_config_path(&first);
        assert_eq!(registry.config_snapshot().formatter_name(), "Default");

        let engine = registry.create_engine("Init", "");
        assert_eq!(engine.formatter_name(), "Null");

        registry.set_config_path(&second);
        assert!(registry.config_snapshot().is_async());
        // existing engines keep their strategy
        assert!(!engine.is_async());
        assert!(registry.create_engine("Later", "").is_async());
    }

    #[test]
    fn test_reset_restores_defaults_and_keeps_factories() {
        let (registry, created) = capture_registry();
        registry.add_sink("Cap", "Capture", "");
        registry.set_async_default(true);
        let engine = registry.create_engine("Before", "");
        assert!(engine.is_async());

        registry.reset();
        assert_eq!(registry.engine_count(), 0);
        assert_eq!(registry.config_snapshot(), Config::default());
        assert!(registry.has_sink_type("Capture"));

        registry.add_sink("Cap", "Capture", "");
        let after = registry.create_engine("Before", "");
        assert!(!Arc::ptr_eq(&engine, &after));
        assert!(!after.is_async());
        assert_eq!(created.lock().len(), 2);
    }

    #[test]
    fn test_custom_formatter_factory() {
        struct Upper;
        impl Formatter for Upper {
            fn format(&self, record: &crate::core::LogRecord<'_>) -> Vec<u8> {
                record.message.to_uppercase().into_bytes()
            }
            fn name(&self) -> &str {
                "Upper"
            }
        }

        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let (registry, created) = capture_registry();
        registry.register_formatter(
            "Upper",
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(Upper) as Arc<dyn Formatter>
            }),
        );
        registry.add_sink("Cap", "Capture", "");
        registry.set_formatter_name("upper");

        registry.create_engine("One", "").info("shout");
        registry.create_engine("Two", "").info("again");

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(created.lock()[0].lines(), vec!["SHOUT", "AGAIN"]);
    }
}
