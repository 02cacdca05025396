//! GPIO adapter error types.

use std::path::PathBuf;

use mediacenter_domain::error::HardwareIoError;
use mediacenter_domain::relay::Pin;

/// Errors specific to the sysfs GPIO adapter.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// A sysfs attribute could not be read or written.
    #[error("GPIO sysfs access failed at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `value` attribute held something other than `0` or `1`.
    #[error("unexpected GPIO value {value:?} at {path}")]
    InvalidValue { path: PathBuf, value: String },
}

impl GpioError {
    /// Convert into a [`HardwareIoError`] for propagation across the port
    /// boundary.
    pub fn into_domain(self, pin: Pin) -> HardwareIoError {
        HardwareIoError::new(pin, self)
    }
}
