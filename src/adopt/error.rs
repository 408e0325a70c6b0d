use std::fmt;

/// Error types for alarm adoption
#[derive(Debug)]
pub enum AdoptError {
    /// The resource source could not produce alarms
    Source(String),

    /// A describe-alarms document did not have the expected shape
    Parse {
        location: String,
        message: String,
    },

    /// No template is registered under this name
    UnknownTemplate(String),

    /// The renderer failed on a registered template
    Render {
        template: String,
        message: String,
    },

    /// Configuration file could not be parsed
    Config(String),

    /// General I/O error
    Io(std::io::Error),

    /// Serialization error
    Serialization(String),
}

impl fmt::Display for AdoptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdoptError::Source(msg) => {
                write!(f, "Failed to list alarms: {}", msg)
            }
            AdoptError::Parse { location, message } => {
                write!(f, "Malformed alarm data at {}: {}", location, message)
            }
            AdoptError::UnknownTemplate(name) => {
                write!(f, "Unknown template '{}'", name)
            }
            AdoptError::Render { template, message } => {
                write!(f, "Failed to render template '{}': {}", template, message)
            }
            AdoptError::Config(msg) => {
                write!(f, "Failed to parse configuration: {}", msg)
            }
            AdoptError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            AdoptError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AdoptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdoptError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AdoptError {
    fn from(err: std::io::Error) -> Self {
        AdoptError::Io(err)
    }
}

impl From<serde_yaml::Error> for AdoptError {
    fn from(err: serde_yaml::Error) -> Self {
        AdoptError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AdoptError {
    fn from(err: serde_json::Error) -> Self {
        AdoptError::Serialization(err.to_string())
    }
}

/// Result type for adoption operations
pub type AdoptResult<T> = Result<T, AdoptError>;
