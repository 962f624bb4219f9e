//! Message-only formatter

use crate::core::{Formatter, LogRecord};

pub const NULL_FORMATTER_NAME: &str = "Null";

/// Emits the message as-is, without any prefix
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFormatter;

impl Formatter for NullFormatter {
    fn format(&self, record: &LogRecord<'_>) -> Vec<u8> {
        record.message.as_bytes().to_vec()
    }

    fn name(&self) -> &str {
        NULL_FORMATTER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, SourceLocation};

    #[test]
    fn test_message_only() {
        let record = LogRecord::new("Tag", LogLevel::Error, SourceLocation::default(), "raw text");
        assert_eq!(NullFormatter.format(&record), b"raw text".to_vec());
    }
}
