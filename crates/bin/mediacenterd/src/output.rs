//! Relay output backend picked at startup.

use mediacenter_adapter_gpio::SysfsGpio;
use mediacenter_adapter_virtual::VirtualDigitalOutput;
use mediacenter_app::ports::DigitalOutput;
use mediacenter_domain::error::HardwareIoError;
use mediacenter_domain::relay::{Level, Pin};

use crate::config::{Config, RelayBackend};

pub enum RelayOutput {
    Sysfs(SysfsGpio),
    Virtual(VirtualDigitalOutput),
}

impl RelayOutput {
    /// Open the backend configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`mediacenter_adapter_gpio::GpioError`] if the sysfs pins
    /// cannot be set up.
    pub fn open(config: &Config) -> Result<Self, mediacenter_adapter_gpio::GpioError> {
        match config.relays.backend {
            RelayBackend::Sysfs => {
                SysfsGpio::open(&config.relays.sysfs_root, config.relay_pins()).map(Self::Sysfs)
            }
            RelayBackend::Virtual => {
                tracing::warn!("using virtual relays, no hardware will be switched");
                Ok(Self::Virtual(VirtualDigitalOutput::default()))
            }
        }
    }
}

impl DigitalOutput for RelayOutput {
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError> {
        match self {
            Self::Sysfs(gpio) => gpio.read(pin),
            Self::Virtual(output) => output.read(pin),
        }
    }

    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError> {
        match self {
            Self::Sysfs(gpio) => gpio.write(pin, level),
            Self::Virtual(output) => output.write(pin, level),
        }
    }
}
