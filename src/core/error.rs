//! Error types for the logging engine
//!
//! None of these ever reach a call site that emits a record. They are returned
//! by the fallible building blocks (config loading, sink construction,
//! formatter resolution) and reported or swallowed by the engine.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Config file could not be read
    #[error("Cannot read configuration file '{path}': {message}")]
    ConfigRead { path: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// No formatter factory registered at all
    #[error("No registered formatter")]
    NoFormatter,

    /// Sink type has no registered factory
    #[error("Unknown sink type '{type_name}' for sink '{name}'")]
    UnknownSinkType { name: String, type_name: String },

    /// Sink panicked while delivering or flushing
    #[error("Sink #{index} panicked: {message}")]
    SinkPanicked { index: usize, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn config_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ConfigRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_sink_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        LoggerError::UnknownSinkType {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Build a panic error from the payload returned by `catch_unwind`
    pub fn sink_panicked(index: usize, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        LoggerError::SinkPanicked { index, message }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
