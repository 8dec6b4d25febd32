use std::fmt;

use validator::ValidationError;

/// Reasons a spin request is turned away. The wheel is left untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    NoOptionsAvailable,
    AlreadySpinning,
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOptionsAvailable => write!(f, "No options available to spin"),
            Self::AlreadySpinning => write!(f, "The wheel is already spinning"),
        }
    }
}

impl std::error::Error for SpinError {}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    MissingOptions,
    InvalidOption {
        index: usize,
        reason: ValidationError,
    },
    InvalidAnimation(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Invalid configuration JSON: {}", e),
            Self::MissingOptions => write!(f, "Configuration has no options list"),
            Self::InvalidOption { index, reason } => {
                write!(f, "Option {} is invalid: {}", index, reason.code)
            }
            Self::InvalidAnimation(reason) => write!(f, "Invalid animation config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}
