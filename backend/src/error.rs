use std::fmt;

use wheel_shared::error::ConfigError;
use wheel_shared::triggers::ParseEventError;

#[derive(Debug)]
pub enum Error {
    Setting { key: &'static str, value: String },
    Event(ParseEventError),
    Config(ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setting { key, value } => write!(f, "Invalid value for {}: {:?}", key, value),
            Self::Event(e) => write!(f, "{}", e),
            Self::Config(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Event(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Setting { .. } => None,
        }
    }
}

impl From<ParseEventError> for Error {
    fn from(err: ParseEventError) -> Self {
        Error::Event(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
