//! Error types for pitilt.
//!
//! Provides unified error handling across configuration, persisted state,
//! servo hardware and the command boundary.

use thiserror::Error;

use crate::servo::Axis;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all pitilt operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Process configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Persisted state could not be loaded or saved
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// Servo hardware error
    #[error("Servo error: {0}")]
    Servo(#[from] ServoError),
    /// Location registry error
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    /// Limit mutation rejected
    #[error(
        "Invalid limits for {axis}: need min ({min}) <= max ({max}), step ({step}) >= 1, sleep ({sleep}) >= 0"
    )]
    InvalidLimits {
        /// Axis whose limits were being changed
        axis: Axis,
        /// Resulting minimum
        min: i32,
        /// Resulting maximum
        max: i32,
        /// Resulting step
        step: u32,
        /// Resulting sleep in seconds
        sleep: f32,
    },
    /// Command received at the MQTT boundary could not be decoded
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("no such config file: {0}")]
    FileMissing(String),
    /// A required field is absent
    #[error("missing required field: {0}")]
    FieldMissing(&'static str),
    /// A file referenced by the configuration does not exist
    #[error("{field} points to a missing file: {path}")]
    ReferencedFileMissing {
        /// Config field name
        field: &'static str,
        /// Path that was checked
        path: String,
    },
    /// Failed to parse TOML configuration
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted state errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// State document is not valid JSON for the expected schema
    #[error("{path} bad, delete or fix it: {source}")]
    Malformed {
        /// State file path
        path: String,
        /// Underlying decode error
        source: serde_json::Error,
    },
    /// State document decoded but violates an invariant
    #[error("invalid state: {0}")]
    Invalid(String),
    /// The reserved `home` location is absent
    #[error("required location 'home' is missing")]
    HomeMissing,
    /// Encoding the state failed
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Servo hardware errors.
#[derive(Debug, Error)]
pub enum ServoError {
    /// PWM channel operation failed
    #[error("{axis} PWM channel failed: {kind:?}")]
    Pwm {
        /// Axis whose channel failed
        axis: Axis,
        /// embedded-hal error classification
        kind: embedded_hal::pwm::ErrorKind,
    },
    /// Requested angle is outside the servo's actuation range
    #[error("{axis} angle {angle} outside actuation range 0..={range}")]
    OutOfRange {
        /// Axis
        axis: Axis,
        /// Requested angle
        angle: i32,
        /// Configured actuation range
        range: i32,
    },
    /// Servo has never been given an angle since power-up
    #[error("{0} angle unknown (servo not homed)")]
    AngleUnknown(Axis),
}

/// Location registry errors.
#[derive(Debug, Error)]
pub enum LocationError {
    /// Name is empty
    #[error("invalid location name '{0}'")]
    InvalidName(String),
    /// Location cannot be removed
    #[error("location '{0}' is reserved")]
    Reserved(&'static str),
}

/// Coarse classification surfaced to transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A named location does not exist
    LocationNotFound,
    /// Actuator I/O failed
    HardwareFault,
    /// State document at load time is malformed
    InvalidPersistedState,
    /// Required config file or field is absent
    ConfigurationMissing,
    /// Config present but unusable
    InvalidConfiguration,
    /// Requested limits violate `min <= max` / `step >= 1`
    InvalidLimits,
    /// MQTT payload did not decode to a known command
    UnknownCommand,
    /// Location name empty or reserved
    InvalidLocation,
    /// State could not be written
    StorageFault,
}

impl ErrorKind {
    /// Stable identifier for response bodies and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::LocationNotFound => "location_not_found",
            ErrorKind::HardwareFault => "hardware_fault",
            ErrorKind::InvalidPersistedState => "invalid_persisted_state",
            ErrorKind::ConfigurationMissing => "configuration_missing",
            ErrorKind::InvalidConfiguration => "invalid_configuration",
            ErrorKind::InvalidLimits => "invalid_limits",
            ErrorKind::UnknownCommand => "unknown_command",
            ErrorKind::InvalidLocation => "invalid_location",
            ErrorKind::StorageFault => "storage_fault",
        }
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(ConfigError::FileMissing(_) | ConfigError::FieldMissing(_)) => {
                ErrorKind::ConfigurationMissing
            }
            Error::Config(_) => ErrorKind::InvalidConfiguration,
            Error::State(StateError::Io(_) | StateError::Encode(_)) => ErrorKind::StorageFault,
            Error::State(_) => ErrorKind::InvalidPersistedState,
            Error::Servo(_) => ErrorKind::HardwareFault,
            Error::Location(_) => ErrorKind::InvalidLocation,
            Error::InvalidLimits { .. } => ErrorKind::InvalidLimits,
            Error::UnknownCommand(_) => ErrorKind::UnknownCommand,
        }
    }

    /// HTTP status an API layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::LocationNotFound => 404,
            ErrorKind::InvalidLimits | ErrorKind::UnknownCommand | ErrorKind::InvalidLocation => {
                400
            }
            ErrorKind::HardwareFault
            | ErrorKind::StorageFault
            | ErrorKind::InvalidPersistedState
            | ErrorKind::ConfigurationMissing
            | ErrorKind::InvalidConfiguration => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = Error::from(ServoError::AngleUnknown(Axis::Pan));
        assert_eq!(err.kind(), ErrorKind::HardwareFault);
        assert_eq!(err.http_status(), 500);

        let err = Error::from(ConfigError::FieldMissing("pitilt.password"));
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);

        let err = Error::UnknownCommand("spin".into());
        assert_eq!(err.kind().as_str(), "unknown_command");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_invalid_limits_message() {
        let err = Error::InvalidLimits {
            axis: Axis::Tilt,
            min: 90,
            max: 10,
            step: 2,
            sleep: 0.0,
        };
        assert!(err.to_string().contains("tilt"));
        assert_eq!(err.kind(), ErrorKind::InvalidLimits);
    }
}
