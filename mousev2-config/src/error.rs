//! Errors of loading `mouse.toml`

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `mouse.toml` couldn't be read
    Read { path: String, message: String },
    /// Not valid TOML, or a field which doesn't belong to the schema.
    /// `path` is `None` when parsing from a string.
    Parse { path: Option<String>, message: String },
    /// A value outside of what the firmware supports
    OutOfRange {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Attach the file a parse error came from
    pub(crate) fn in_file(self, file: &str) -> Self {
        match self {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(file.to_string()),
                message,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => write!(f, "Can't read '{}': {}", path, message),
            ConfigError::Parse { path: Some(path), message } => write!(f, "'{}' is invalid: {}", path, message),
            ConfigError::Parse { path: None, message } => write!(f, "mouse.toml is invalid: {}", message),
            ConfigError::OutOfRange { field, value, expected } => {
                write!(f, "{} = {} is out of range, expected {}", field, value, expected)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;
