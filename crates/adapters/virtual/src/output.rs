//! In-memory digital outputs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use mediacenter_app::ports::DigitalOutput;
use mediacenter_domain::error::HardwareIoError;
use mediacenter_domain::relay::{Level, Pin};

/// Pins that remember the last level written; unwritten pins read low.
#[derive(Debug, Default)]
pub struct VirtualDigitalOutput {
    levels: Mutex<HashMap<Pin, Level>>,
}

impl VirtualDigitalOutput {
    /// Current level of `pin` without going through the port.
    #[must_use]
    pub fn level(&self, pin: Pin) -> Level {
        self.lock().get(&pin).copied().unwrap_or(Level::Low)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Pin, Level>> {
        self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DigitalOutput for VirtualDigitalOutput {
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError> {
        Ok(self.level(pin))
    }

    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError> {
        tracing::trace!(pin = %pin, high = level.is_high(), "virtual pin write");
        self.lock().insert(pin, level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_low_before_any_write() {
        let output = VirtualDigitalOutput::default();
        assert_eq!(output.read(Pin::new(6)).unwrap(), Level::Low);
    }

    #[test]
    fn should_read_back_written_level() {
        let output = VirtualDigitalOutput::default();
        output.write(Pin::new(19), Level::High).unwrap();

        assert_eq!(output.read(Pin::new(19)).unwrap(), Level::High);
        assert_eq!(output.level(Pin::new(26)), Level::Low);
    }
}
