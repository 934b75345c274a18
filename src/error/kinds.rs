use std::{fmt, io};

/// Crate-wide `Result` type using [`SumoqError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SumoqError>;

/// Top-level error type for sumoq operations.
#[derive(Debug)]
pub enum SumoqError {
    /// Configuration errors.
    Config(ConfigError),

    /// Background producer errors.
    Producer(ProducerError),

    /// I/O errors.
    Io(io::Error),

    /// HTTP client errors from the metadata API.
    Http(reqwest::Error),

    /// JSON encode/decode errors.
    Json(serde_json::Error),

    /// TOML decode errors.
    Toml(toml::de::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Anything else.
    Generic(String),
}

/// Errors raised inside a background producer.
///
/// These never cross the producer boundary; they are logged and the
/// affected cache category is left as it was.
#[derive(Debug)]
pub enum ProducerError {
    /// The metadata API answered with a non-success status.
    Status { url: String, status: u16 },

    /// The namespace lister exited unsuccessfully.
    CommandFailed { command: String, code: Option<i32>, stderr: String },

    /// A payload could not be understood.
    MalformedPayload(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for SumoqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SumoqError::Config(e) => write!(f, "Configuration error: {e}"),
            SumoqError::Producer(e) => write!(f, "Producer error: {e}"),
            SumoqError::Io(e) => write!(f, "I/O error: {e}"),
            SumoqError::Http(e) => write!(f, "HTTP error: {e}"),
            SumoqError::Json(e) => write!(f, "JSON error: {e}"),
            SumoqError::Toml(e) => write!(f, "TOML error: {e}"),
            SumoqError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ProducerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerError::Status { url, status } => {
                write!(f, "{url} answered with status {status}")
            }
            ProducerError::CommandFailed {
                command,
                code,
                stderr,
            } => match code {
                Some(code) => write!(f, "'{command}' exited with code {code}: {stderr}"),
                None => write!(f, "'{command}' was terminated by a signal: {stderr}"),
            },
            ProducerError::MalformedPayload(msg) => write!(f, "Malformed payload: {msg}"),
        }
    }
}

impl std::error::Error for SumoqError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ProducerError {}

/* ========================= Conversions to SumoqError ========================= */

impl From<io::Error> for SumoqError {
    fn from(err: io::Error) -> Self {
        SumoqError::Io(err)
    }
}

impl From<reqwest::Error> for SumoqError {
    fn from(err: reqwest::Error) -> Self {
        SumoqError::Http(err)
    }
}

impl From<serde_json::Error> for SumoqError {
    fn from(err: serde_json::Error) -> Self {
        SumoqError::Json(err)
    }
}

impl From<toml::de::Error> for SumoqError {
    fn from(err: toml::de::Error) -> Self {
        SumoqError::Toml(err)
    }
}

impl From<ConfigError> for SumoqError {
    fn from(err: ConfigError) -> Self {
        SumoqError::Config(err)
    }
}

impl From<ProducerError> for SumoqError {
    fn from(err: ProducerError) -> Self {
        SumoqError::Producer(err)
    }
}

impl From<String> for SumoqError {
    fn from(msg: String) -> Self {
        SumoqError::Generic(msg)
    }
}

impl From<&str> for SumoqError {
    fn from(msg: &str) -> Self {
        SumoqError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_error_display() {
        let err = SumoqError::from(ProducerError::Status {
            url: "https://api.example.com/v1/partitions".to_string(),
            status: 401,
        });
        assert_eq!(
            err.to_string(),
            "Producer error: https://api.example.com/v1/partitions answered with status 401"
        );
    }

    #[test]
    fn test_command_failed_display() {
        let err = ProducerError::CommandFailed {
            command: "kubectl".to_string(),
            code: Some(1),
            stderr: "no context".to_string(),
        };
        assert_eq!(err.to_string(), "'kubectl' exited with code 1: no context");
    }

    #[test]
    fn test_string_conversion() {
        let err: SumoqError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
