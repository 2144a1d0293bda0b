//! Error types for drive scanning

use std::io;
use thiserror::Error;

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Failures outside the telemetry engine.
///
/// Missing or malformed diagnostic fields are never errors; they surface as
/// absent values in the analysis. Only I/O, the device-class boundary and the
/// front-ends report through this type.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Device name has no rule set
    #[error("Unknown device class: {0}")]
    UnknownDeviceClass(String),

    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The diagnostic utility could not be started or waited on
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid command-line value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Window could not be created
    #[error("GUI error: {0}")]
    Gui(String),
}
