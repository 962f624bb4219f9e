//! Routing configuration
//!
//! Which sinks exist, which tags write where and at which level, whether
//! engines deliver asynchronously, and which formatter they use. A `Config`
//! is plain data: the [`Registry`](crate::core::Registry) owns one and reads
//! it when it creates engines.

pub mod case_map;
pub mod parser;

pub use case_map::CaseMap;
pub use parser::{parse_file, parse_reader, parse_str, Entries, Sections};

use crate::core::{async_consumer::DEFAULT_QUEUE_CAPACITY, LogLevel, LoggerError, Result};
use crate::formatters::DEFAULT_FORMATTER_NAME;
use crate::sinks::STDOUT_SINK_TYPE;
use serde::Serialize;
use std::path::Path;

/// Rule key applying to every tag without a rule of its own
pub const DEFAULT_TAG: &str = "*";

/// Name of the sink registered until the first explicit registration
pub const IMPLICIT_SINK_NAME: &str = "Stdout";

const GENERAL_SECTION: &str = "general";
const SINK_SECTIONS: [&str; 2] = ["logger", "loggers"];
const LEVEL_SECTIONS: [&str; 4] = ["level", "levels", "log_level", "log_levels"];

/// Where a named sink writes: a factory type plus a type-specific address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SinkDescriptor {
    #[serde(rename = "type")]
    pub sink_type: String,
    pub address: String,
}

impl SinkDescriptor {
    pub fn new(sink_type: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            sink_type: sink_type.into(),
            address: address.into(),
        }
    }
}

/// Level and sink names for one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRule {
    pub level: LogLevel,
    pub sinks: Vec<String>,
}

impl Default for TagRule {
    fn default() -> Self {
        Self {
            level: LogLevel::Verbose,
            sinks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    sinks: CaseMap<SinkDescriptor>,
    rules: CaseMap<TagRule>,
    #[serde(rename = "async")]
    async_default: bool,
    formatter: String,
    queue_capacity: usize,
    #[serde(skip)]
    implicit_sinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut sinks = CaseMap::new();
        sinks.insert(
            IMPLICIT_SINK_NAME,
            SinkDescriptor::new(STDOUT_SINK_TYPE, ""),
        );
        Self {
            sinks,
            rules: CaseMap::new(),
            async_default: false,
            formatter: DEFAULT_FORMATTER_NAME.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            implicit_sinks: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sinks(&self) -> &CaseMap<SinkDescriptor> {
        &self.sinks
    }

    pub fn rules(&self) -> &CaseMap<TagRule> {
        &self.rules
    }

    pub fn is_async(&self) -> bool {
        self.async_default
    }

    pub fn formatter_name(&self) -> &str {
        &self.formatter
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Register or overwrite a named sink
    ///
    /// The first explicit registration replaces the implicit `Stdout` sink.
    pub fn add_sink(&mut self, name: &str, sink_type: &str, address: &str) {
        if self.implicit_sinks {
            self.implicit_sinks = false;
            self.sinks.clear();
        }
        self.sinks
            .insert(name, SinkDescriptor::new(sink_type, address));
        self.check_tags();
    }

    /// Sinks of the default rule, from a comma separated list of names
    pub fn set_default_sinks(&mut self, names_csv: &str) {
        let sinks = self.split_sinks(names_csv);
        self.rules.entry_or_default(DEFAULT_TAG).sinks = sinks;
    }

    pub fn set_default_level(&mut self, level: LogLevel) {
        self.rules.entry_or_default(DEFAULT_TAG).level = level;
    }

    pub fn set_async_default(&mut self, enabled: bool) {
        self.async_default = enabled;
    }

    pub fn set_formatter_name(&mut self, name: impl Into<String>) {
        self.formatter = name.into();
    }

    /// Zero is ignored
    pub fn set_queue_capacity(&mut self, capacity: usize) {
        if capacity > 0 {
            self.queue_capacity = capacity;
        }
    }

    /// The tag's own rule, else the default rule
    pub fn rule_for(&self, tag: &str) -> Option<&TagRule> {
        self.rules.get(tag).or_else(|| self.rules.get(DEFAULT_TAG))
    }

    /// Known sink names from a comma separated list, in order
    ///
    /// Tokens are trimmed; empty tokens and unknown names are dropped.
    /// Duplicates are kept.
    pub fn split_sinks(&self, names_csv: &str) -> Vec<String> {
        names_csv
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty() && self.sinks.contains_key(name))
            .map(str::to_string)
            .collect()
    }

    /// Drop unknown sink names from every rule; a rule left without sinks
    /// falls back to the first registered sink.
    pub fn check_tags(&mut self) {
        let first = self.sinks.first().map(|(name, _)| name.to_string());
        let sinks = &self.sinks;

        for (_, rule) in self.rules.iter_mut() {
            rule.sinks.retain(|name| sinks.contains_key(name));
            if rule.sinks.is_empty() {
                if let Some(first) = &first {
                    rule.sinks.push(first.clone());
                }
            }
        }
    }

    /// Apply tokenized config file sections
    pub fn apply_file_config(&mut self, sections: &Sections) {
        if let Some(general) = sections.get(GENERAL_SECTION) {
            self.apply_general(general);
        }
        if let Some(entries) = SINK_SECTIONS.iter().find_map(|s| sections.get(s)) {
            self.apply_sinks(entries);
        }
        if let Some(entries) = LEVEL_SECTIONS.iter().find_map(|s| sections.get(s)) {
            self.apply_levels(entries);
        }
    }

    /// Read, tokenize and apply a config file
    ///
    /// Returns `Ok(false)` without touching the configuration when `path` is
    /// not a readable file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(false);
        }
        let sections = parse_file(path)?;
        self.apply_file_config(&sections);
        Ok(true)
    }

    fn apply_general(&mut self, entries: &Entries) {
        if let Some(value) = entries.get("async") {
            self.async_default = matches!(value.chars().next(), Some('1' | 'T' | 't'));
        }
        if let Some(value) = entries.get("formatter") {
            self.formatter = value.clone();
        }
        if let Some(value) = entries.get("queue_size") {
            match parse_queue_size(value) {
                Ok(capacity) => self.queue_capacity = capacity,
                Err(e) => eprintln!("[SIMPLELOG WARNING] {}", e),
            }
        }
    }

    fn apply_sinks(&mut self, entries: &Entries) {
        if !entries.is_empty() {
            self.implicit_sinks = false;
            self.sinks.clear();
        }
        for (name, value) in entries.iter() {
            let (sink_type, address) = split_pair(value);
            if !sink_type.is_empty() {
                self.sinks.insert(name, SinkDescriptor::new(sink_type, address));
            }
        }
        self.check_tags();
    }

    fn apply_levels(&mut self, entries: &Entries) {
        if !entries.is_empty() {
            self.rules.clear();
        }
        for (tag, value) in entries.iter() {
            if value.is_empty() {
                continue;
            }
            let first = value.split(',').next().unwrap_or_default().trim();
            let rule = TagRule {
                level: first.parse().unwrap_or(LogLevel::Verbose),
                sinks: self.split_sinks(value),
            };
            if rule.level != LogLevel::Verbose || !rule.sinks.is_empty() {
                self.rules.insert(tag, rule);
            }
        }
    }
}

/// Parse a `queue_size` value: a positive integer
fn parse_queue_size(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(LoggerError::config(
            "queue_size",
            format!("'{}' is not a positive integer", value),
        )),
    }
}

/// Split `type[:address]` on the first colon
pub fn split_pair(value: &str) -> (&str, &str) {
    value.split_once(':').unwrap_or((value, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(config: &mut Config, text: &str) {
        config.apply_file_config(&parse_str(text));
    }

    fn descriptors(config: &Config) -> Vec<(String, String, String)> {
        config
            .sinks()
            .iter()
            .map(|(n, d)| (n.to_string(), d.sink_type.clone(), d.address.clone()))
            .collect()
    }

    fn triple(name: &str, sink_type: &str, address: &str) -> (String, String, String) {
        (name.to_string(), sink_type.to_string(), address.to_string())
    }

    const THREE_SINKS: &str = "[LOGGERS]\n\
                               Console = Stdout\n\
                               Network = Tcp\n\
                               FileTmp = File\n";

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.formatter_name(), "Default");
        assert!(!config.is_async());
        assert_eq!(config.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(descriptors(&config), vec![triple("Stdout", "Stdout", "")]);
        assert!(config.rules().is_empty());
        assert!(config.rule_for("Anything").is_none());
    }

    #[test]
    fn test_general_async() {
        let mut config = Config::new();
        update(&mut config, "[GENERAL]\nAsync = 1\n");
        assert!(config.is_async());
        update(&mut config, "[general]\nasync = 0\n");
        assert!(!config.is_async());
        update(&mut config, "[general]\nasync = true\n");
        assert!(config.is_async());
        update(&mut config, "[general]\nasync = yes\n");
        assert!(!config.is_async());
        assert_eq!(config.formatter_name(), "Default");
    }

    #[test]
    fn test_general_formatter_and_unknown_keys() {
        let mut config = Config::new();
        update(&mut config, "[General]\nFormatter = Test\ncoucou = Test\n");
        assert_eq!(config.formatter_name(), "Test");
        update(&mut config, "[general]\nformatter = coucou\n");
        assert_eq!(config.formatter_name(), "coucou");
    }

    #[test]
    fn test_general_queue_size() {
        let mut config = Config::new();
        update(&mut config, "[general]\nqueue_size = 128\n");
        assert_eq!(config.queue_capacity(), 128);
        update(&mut config, "[general]\nqueue_size = 0\n");
        assert_eq!(config.queue_capacity(), 128);
        update(&mut config, "[general]\nqueue_size = lots\n");
        assert_eq!(config.queue_capacity(), 128);

        let err = parse_queue_size("-4").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("queue_size"));
    }

    #[test]
    fn test_sink_section() {
        let mut config = Config::new();
        update(
            &mut config,
            "[LOGGERS]\nConsole = Stdout\nFileTmp = File:/tmp/logs.txt\n",
        );
        assert_eq!(
            descriptors(&config),
            vec![
                triple("Console", "Stdout", ""),
                triple("FileTmp", "File", "/tmp/logs.txt"),
            ]
        );
    }

    #[test]
    fn test_sink_section_limits() {
        let mut config = Config::new();
        update(
            &mut config,
            "[logger]\n\
             Console = Stdout:\n\
             Network = Tcp:127.0.0.5:1234\n\
             FileTmp = :/tmp/logs.txt\n",
        );
        assert_eq!(
            descriptors(&config),
            vec![
                triple("Console", "Stdout", ""),
                triple("Network", "Tcp", "127.0.0.5:1234"),
            ]
        );
    }

    #[test]
    fn test_first_sink_section_wins() {
        let mut config = Config::new();
        update(&mut config, "[logger]\nA = Stdout\n[loggers]\nB = Stderr\n");
        assert_eq!(descriptors(&config), vec![triple("A", "Stdout", "")]);
    }

    #[test]
    fn test_default_rule_from_file() {
        let mut config = Config::new();
        update(&mut config, &format!("{}[LEVELS]\n* = Console\n", THREE_SINKS));
        let rule = config.rule_for("Any").expect("default rule");
        assert_eq!(rule.sinks, vec!["Console"]);

        update(
            &mut config,
            &format!("{}[Log_Level]\n* = Console,FileTmp\n", THREE_SINKS),
        );
        let rule = config.rule_for("Any").expect("default rule");
        assert_eq!(rule.sinks, vec!["Console", "FileTmp"]);
        assert_eq!(rule.level, LogLevel::Verbose);
    }

    #[test]
    fn test_rule_sink_list_errors() {
        let mut config = Config::new();
        update(
            &mut config,
            &format!("{}[level]\n* = ,Console,,Test,,FileTmp,\n", THREE_SINKS),
        );
        let rule = config.rule_for("x").expect("default rule");
        assert_eq!(rule.sinks, vec!["Console", "FileTmp"]);

        // Nothing valid and the level stays Verbose: no rule at all
        update(
            &mut config,
            &format!("{}[LOG_LEVELS]\n* = ,,Test,,FileTmp2,\n", THREE_SINKS),
        );
        assert!(config.rules().is_empty());
    }

    #[test]
    fn test_level_rules() {
        let mut config = Config::new();
        update(
            &mut config,
            &format!(
                "{}[levels]\n* = warning\nNetwork = d,Network\nChatty = Console,coucou\nEmpty =\n",
                THREE_SINKS
            ),
        );

        let default = config.rule_for("Unruled").expect("default rule");
        assert_eq!(default.level, LogLevel::Warning);
        assert!(default.sinks.is_empty());

        let network = config.rule_for("NETWORK").expect("network rule");
        assert_eq!(network.level, LogLevel::Debug);
        assert_eq!(network.sinks, vec!["Network"]);

        let chatty = config.rule_for("Chatty").expect("chatty rule");
        assert_eq!(chatty.level, LogLevel::Verbose);
        assert_eq!(chatty.sinks, vec!["Console"]);

        assert!(!config.rules().contains_key("Empty"));
    }

    #[test]
    fn test_level_section_replaces_previous_rules() {
        let mut config = Config::new();
        update(&mut config, &format!("{}[levels]\nA = error\n", THREE_SINKS));
        update(&mut config, "[levels]\nB = info\n");
        assert!(!config.rules().contains_key("A"));
        assert_eq!(config.rules().get("B").map(|r| r.level), Some(LogLevel::Info));
    }

    #[test]
    fn test_add_sink_replaces_implicit_default() {
        let mut config = Config::new();
        config.add_sink("X", "Stdout", "");
        assert_eq!(descriptors(&config), vec![triple("X", "Stdout", "")]);

        config.add_sink("Y", "File", "/tmp/y.log");
        config.add_sink("x", "Stderr", "");
        assert_eq!(
            descriptors(&config),
            vec![triple("X", "Stderr", ""), triple("Y", "File", "/tmp/y.log")]
        );
    }

    #[test]
    fn test_check_tags_prunes_and_falls_back() {
        let mut config = Config::new();
        update(
            &mut config,
            &format!("{}[levels]\n* = Network\nError = e,Console,FileTmp\n", THREE_SINKS),
        );
        update(&mut config, "[loggers]\nFileTmp = File\nOther = Stderr\n");

        let sinks_of = |tag: &str| config.rules().get(tag).map(|r| r.sinks.clone());
        assert_eq!(sinks_of("Error"), Some(vec!["FileTmp".to_string()]));
        // Network vanished: first registered sink instead
        assert_eq!(sinks_of("*"), Some(vec!["FileTmp".to_string()]));
    }

    #[test]
    fn test_programmatic_defaults() {
        let mut config = Config::new();
        config.add_sink("Console", "Stdout", "");
        config.add_sink("Disk", "File", "");
        config.set_default_sinks("Disk, nope ,Console,Disk");
        config.set_default_level(LogLevel::Info);

        let rule = config.rule_for("Any").expect("default rule");
        assert_eq!(rule.sinks, vec!["Disk", "Console", "Disk"]);
        assert_eq!(rule.level, LogLevel::Info);

        config.set_async_default(true);
        config.set_formatter_name("Null");
        config.set_queue_capacity(0);
        assert!(config.is_async());
        assert_eq!(config.formatter_name(), "Null");
        assert_eq!(config.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("Stdout"), ("Stdout", ""));
        assert_eq!(split_pair("Stdout:"), ("Stdout", ""));
        assert_eq!(split_pair(":/tmp/x"), ("", "/tmp/x"));
        assert_eq!(split_pair("Tcp:1.2.3.4:80"), ("Tcp", "1.2.3.4:80"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("simplelog.ini");
        std::fs::write(&path, "[general]\nasync = 1\n").expect("write config");

        let mut config = Config::new();
        let missing = dir.path().join("missing.ini");
        assert!(!config.load_file(missing).expect("missing is not an error"));
        assert!(!config.is_async());
        assert!(config.load_file(&path).expect("load"));
        assert!(config.is_async());
    }
}
