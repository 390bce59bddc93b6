use std::{fmt, io};

/// Crate-wide `Result` type using [`CompadreError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, CompadreError>;

/// Top-level error type for compadre operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum CompadreError {
    /// Configuration errors.
    Config(ConfigError),

    /// Completion spec / registry errors.
    Registry(RegistryError),

    /// Completion provider errors.
    ///
    /// These never reach the user during a completion round-trip: the
    /// adapter absorbs them into an empty candidate set. They surface only
    /// through diagnostic commands such as `compadre specs --validate`.
    Provider(ProviderError),

    /// I/O errors.
    Io(io::Error),

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

    /// Generic configuration error.
    Generic(String),
}

/// Completion spec / registry errors.
#[derive(Debug)]
pub enum RegistryError {
    /// No spec file describes the requested tool.
    SpecNotFound(String),

    /// A spec file failed to parse or failed validation.
    InvalidSpec { path: String, reason: String },

    /// Two commands in one spec share a name.
    DuplicateCommand(String),

    /// Two options of one command share a flag spelling.
    DuplicateFlag { command: String, flag: String },
}

/// Completion provider errors.
///
/// One variant per failure class the adapter must fail open on:
/// spawn failure, non-zero exit, timeout, and undecodable output.
#[derive(Debug)]
pub enum ProviderError {
    /// The provider program could not be spawned.
    Unavailable(String),

    /// The provider exited with a non-zero status.
    NonZeroExit(Option<i32>),

    /// The provider did not answer within the deadline.
    Timeout(u64),

    /// The provider's output stream could not be decoded at all.
    Malformed(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for CompadreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompadreError::Config(e) => write!(f, "Configuration error: {e}"),
            CompadreError::Registry(e) => write!(f, "Spec error: {e}"),
            CompadreError::Provider(e) => write!(f, "Provider error: {e}"),
            CompadreError::Io(e) => write!(f, "I/O error: {e}"),
            CompadreError::Generic(msg) => write!(f, "{msg}"),
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

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::SpecNotFound(tool) => {
                write!(f, "No completion spec found for tool: {tool}")
            }
            RegistryError::InvalidSpec { path, reason } => {
                write!(f, "Invalid spec '{path}': {reason}")
            }
            RegistryError::DuplicateCommand(name) => {
                write!(f, "Duplicate command in spec: {name}")
            }
            RegistryError::DuplicateFlag { command, flag } => {
                write!(f, "Duplicate flag '{flag}' on command '{command}'")
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable(msg) => write!(f, "Provider unavailable: {msg}"),
            ProviderError::NonZeroExit(Some(code)) => {
                write!(f, "Provider exited with status {code}")
            }
            ProviderError::NonZeroExit(None) => {
                write!(f, "Provider terminated by signal")
            }
            ProviderError::Timeout(ms) => {
                write!(f, "Provider did not answer within {ms}ms")
            }
            ProviderError::Malformed(msg) => write!(f, "Undecodable provider output: {msg}"),
        }
    }
}

impl std::error::Error for CompadreError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for RegistryError {}
impl std::error::Error for ProviderError {}

/* ========================= Conversions to CompadreError ========================= */

impl From<ConfigError> for CompadreError {
    fn from(e: ConfigError) -> Self {
        CompadreError::Config(e)
    }
}

impl From<RegistryError> for CompadreError {
    fn from(e: RegistryError) -> Self {
        CompadreError::Registry(e)
    }
}

impl From<ProviderError> for CompadreError {
    fn from(e: ProviderError) -> Self {
        CompadreError::Provider(e)
    }
}

impl From<io::Error> for CompadreError {
    fn from(e: io::Error) -> Self {
        CompadreError::Io(e)
    }
}

impl From<String> for CompadreError {
    fn from(msg: String) -> Self {
        CompadreError::Generic(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_provider_errors() {
        let err = ProviderError::NonZeroExit(Some(1));
        assert_eq!(err.to_string(), "Provider exited with status 1");

        let err = ProviderError::Timeout(200);
        assert_eq!(err.to_string(), "Provider did not answer within 200ms");
    }

    #[test]
    fn test_wrapping_conversions() {
        let err: CompadreError = RegistryError::SpecNotFound("redtime".to_string()).into();
        assert!(matches!(err, CompadreError::Registry(_)));
        assert!(err.to_string().contains("redtime"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: CompadreError = io_err.into();
        assert!(matches!(err, CompadreError::Io(_)));
    }
}
