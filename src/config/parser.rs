//! INI-like config file tokenizer
//!
//! Produces a `section -> key -> value` mapping. Accepted syntax:
//!
//! ```text
//! # comment
//! [section name]      trailing text after the first ']' is ignored
//! key = value         exactly one value token, whitespace around '=' optional
//! ```
//!
//! Malformed lines are skipped silently: unterminated or empty section
//! headers, entries outside any section, missing key, missing `=`, missing
//! value, a value starting with `=`, or anything after the value token.
//! Duplicate keys keep the last value; repeated section headers accumulate
//! into the same section. Section and key lookups are case-insensitive.

use super::case_map::CaseMap;
use crate::core::{LoggerError, Result};
use std::io::Read;
use std::path::Path;

pub type Entries = CaseMap<String>;
pub type Sections = CaseMap<Entries>;

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Section(&'a str),
    Entry(&'a str, &'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }

    if let Some(header) = line.strip_prefix('[') {
        return match header.find(']') {
            Some(0) | None => Line::Skip,
            Some(end) => Line::Section(&header[..end]),
        };
    }

    let key_end = match line.find(|c: char| c.is_whitespace() || c == '=') {
        Some(0) | None => return Line::Skip,
        Some(end) => end,
    };
    let key = &line[..key_end];

    let rest = match line[key_end..].trim_start().strip_prefix('=') {
        Some(rest) => rest.trim_start(),
        None => return Line::Skip,
    };
    if rest.is_empty() || rest.starts_with('=') {
        return Line::Skip;
    }

    let value_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if !rest[value_end..].trim().is_empty() {
        return Line::Skip;
    }

    Line::Entry(key, &rest[..value_end])
}

/// Tokenize config text
pub fn parse_str(text: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        match classify(line) {
            Line::Skip => {}
            Line::Section(name) => current = Some(name),
            Line::Entry(key, value) => {
                if let Some(section) = current {
                    sections
                        .entry_or_default(section)
                        .insert(key, value.to_string());
                }
            }
        }
    }

    sections
}

/// Tokenize everything readable from `reader`; invalid UTF-8 is replaced
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Sections> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    Ok(parse_str(&String::from_utf8_lossy(&raw)))
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Sections> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| LoggerError::config_read(path.display().to_string(), e.to_string()))?;
    parse_reader(std::io::BufReader::new(file))
}
