//! # Error Types
//!
//! Custom error types for Robot Teleop using `thiserror`.
//!
//! The mapping core never fails: ownership conflicts are logged and the call
//! becomes a no-op. These errors cover the layers around it (configuration,
//! device discovery, and the serial motor link).

use thiserror::Error;

/// Main error type for Robot Teleop
#[derive(Debug, Error)]
pub enum TeleopError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Controller device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No supported controller found under /dev/input
    #[error("No PS5 DualSense controller found")]
    ControllerNotFound,

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial devices could be opened
    #[error("Serial port not found (tried: {0})")]
    SerialPortNotFound(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Motor link framing errors
    #[error("Motor link protocol error: {0}")]
    LinkProtocol(String),
}

/// Result type alias for Robot Teleop
pub type Result<T> = std::result::Result<T, TeleopError>;
