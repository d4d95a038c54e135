//! Error types and handling for `CarbonTrip`

use thiserror::Error;

/// Main error type for the `CarbonTrip` calculator
#[derive(Error, Debug)]
pub enum CalculatorError {
    /// Malformed mode registry, empty mode set or invalid settings
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A requested key or name is not part of the supplied data
    #[error("Lookup error: {message}")]
    Lookup { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Data file parsing errors
    #[error("Data error: {source}")]
    Data {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CalculatorError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new lookup error
    pub fn lookup<S: Into<String>>(message: S) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CalculatorError::Configuration { message } => {
                format!("Configuration error: {message}. Please check your transport mode data and config file.")
            }
            CalculatorError::Lookup { message } => message.clone(),
            CalculatorError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            CalculatorError::Data { .. } => {
                "Reference data could not be parsed. Please check your data files.".to_string()
            }
            CalculatorError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
