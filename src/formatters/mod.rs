//! Formatter implementations

pub mod default;
pub mod null;

pub use default::{DefaultFormatter, DEFAULT_FORMATTER_NAME};
pub use null::{NullFormatter, NULL_FORMATTER_NAME};

pub use crate::core::Formatter;
