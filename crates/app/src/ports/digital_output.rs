//! Digital output port — the raw GPIO pins behind the relay bank.

use std::sync::Arc;

use mediacenter_domain::error::HardwareIoError;
use mediacenter_domain::relay::{Level, Pin};

/// Read-back capable digital outputs.
///
/// `read` must report the level the pin is actually driven at, not the last
/// value written through this handle: the relay bank relies on it to skip
/// redundant writes after an external reset.
pub trait DigitalOutput: Send + Sync {
    /// Current level of `pin`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareIoError`] when the pin cannot be read.
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError>;

    /// Drive `pin` to `level`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareIoError`] when the pin cannot be written.
    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError>;
}

impl<T: DigitalOutput + ?Sized> DigitalOutput for Arc<T> {
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError> {
        (**self).read(pin)
    }

    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError> {
        (**self).write(pin, level)
    }
}
