//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MediaCenterError`] via `#[from]`. Adapter crates wrap their IO failures
//! in [`HardwareIoError`] or [`AmplifierError`] at the port boundary.

use crate::device::DeviceName;
use crate::relay::Pin;

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every control operation.
#[derive(Debug, thiserror::Error)]
pub enum MediaCenterError {
    #[error("unknown device")]
    UnknownDevice(#[from] UnknownDeviceError),

    #[error("unknown relay")]
    UnknownRelay(#[from] UnknownRelayError),

    #[error("hardware IO error")]
    Hardware(#[from] HardwareIoError),

    #[error("amplifier error")]
    Amplifier(#[from] AmplifierError),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A bridge transport (MQTT, …) failed to deliver a message.
    #[error("transport error")]
    Transport(#[source] BoxError),
}

/// A device name that is not part of the configured registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device: {name}")]
pub struct UnknownDeviceError {
    pub name: String,
}

/// A relay address outside the configured bank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relay {address} (bank has {size} relays)")]
pub struct UnknownRelayError {
    pub address: u8,
    pub size: usize,
}

/// A digital-output read or write failed.
#[derive(Debug, thiserror::Error)]
#[error("digital output failed on pin {pin}")]
pub struct HardwareIoError {
    pub pin: Pin,
    #[source]
    pub source: BoxError,
}

impl HardwareIoError {
    /// Wrap a driver error for the given pin.
    pub fn new(pin: Pin, source: impl Into<BoxError>) -> Self {
        Self {
            pin,
            source: source.into(),
        }
    }
}

/// An amplifier command could not be delivered.
#[derive(Debug, thiserror::Error)]
#[error("amplifier command {command} failed")]
pub struct AmplifierError {
    pub command: &'static str,
    #[source]
    pub source: BoxError,
}

impl AmplifierError {
    /// Wrap a driver error for the named command.
    pub fn new(command: &'static str, source: impl Into<BoxError>) -> Self {
        Self {
            command,
            source: source.into(),
        }
    }
}

/// Rejected input values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("volume {0} is out of range 0..=100")]
    VolumeOutOfRange(i64),

    #[error("invalid volume: {0:?}")]
    InvalidVolume(String),

    #[error("relay address {0} is out of range")]
    RelayAddressOutOfRange(u8),

    #[error("action {action} requires an argument")]
    MissingArgument { action: &'static str },

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("device {0} has no volume")]
    NoVolume(DeviceName),
}
