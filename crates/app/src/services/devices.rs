//! Logical devices — relays and the shared amplifier composed into the
//! things a user switches on and off.
//!
//! Every device is a two-state machine. `is_on` only changes once a whole
//! transition has succeeded; a failing step leaves it where it was.

pub mod bluetooth;
pub mod printer;
pub mod tv;
pub mod turntable;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::{MediaCenterError, ValidationError};

use crate::ports::{AmplifierDriver, Clock, DigitalOutput};

pub use bluetooth::BluetoothStreamer;
pub use printer::Printer;
pub use tv::Tv;
pub use turntable::Turntable;

/// A device that can be switched on and off.
pub trait PoweredDevice: Send + Sync {
    fn name(&self) -> DeviceName;

    /// Run the power-on sequence. Running it while on is harmless.
    fn turn_on(&self) -> impl Future<Output = Result<(), MediaCenterError>> + Send;

    /// Run the power-off sequence. Running it while off is harmless.
    fn turn_off(&self) -> impl Future<Output = Result<(), MediaCenterError>> + Send;

    /// Result of the last successfully completed transition.
    fn is_on(&self) -> bool;
}

/// Power flag shared by every device implementation.
#[derive(Debug, Default)]
pub(crate) struct PowerState(AtomicBool);

impl PowerState {
    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, on: bool) {
        self.0.store(on, Ordering::Release);
    }
}

/// Any device of the registry.
pub enum LogicalDevice<O, A, C> {
    Tv(Tv<O, A, C>),
    Bluetooth(BluetoothStreamer<O, A, C>),
    Turntable(Turntable<O, A, C>),
    Printer(Printer<O>),
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> LogicalDevice<O, A, C> {
    /// Cached amplifier volume, `None` for devices without audio.
    #[must_use]
    pub fn volume(&self) -> Option<Volume> {
        match self {
            Self::Tv(device) => Some(device.volume()),
            Self::Bluetooth(device) => Some(device.volume()),
            Self::Turntable(device) => Some(device.volume()),
            Self::Printer(_) => None,
        }
    }

    /// Request an amplifier volume through an audio device.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoVolume`] for devices without audio, or
    /// the amplifier error if the command cannot be delivered.
    pub fn set_volume(&self, volume: Volume) -> Result<(), MediaCenterError> {
        match self {
            Self::Tv(device) => device.set_volume(volume),
            Self::Bluetooth(device) => device.set_volume(volume),
            Self::Turntable(device) => device.set_volume(volume),
            Self::Printer(device) => Err(ValidationError::NoVolume(device.name()).into()),
        }
    }

    /// Mark the device off without running its sequence, after the board
    /// has cut every relay.
    pub(crate) fn force_off(&self) {
        match self {
            Self::Tv(device) => device.power.set(false),
            Self::Bluetooth(device) => device.power.set(false),
            Self::Turntable(device) => device.power.set(false),
            Self::Printer(device) => device.power.set(false),
        }
    }
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> PoweredDevice for LogicalDevice<O, A, C> {
    fn name(&self) -> DeviceName {
        match self {
            Self::Tv(device) => device.name(),
            Self::Bluetooth(device) => device.name(),
            Self::Turntable(device) => device.name(),
            Self::Printer(device) => device.name(),
        }
    }

    async fn turn_on(&self) -> Result<(), MediaCenterError> {
        match self {
            Self::Tv(device) => device.turn_on().await,
            Self::Bluetooth(device) => device.turn_on().await,
            Self::Turntable(device) => device.turn_on().await,
            Self::Printer(device) => device.turn_on().await,
        }
    }

    async fn turn_off(&self) -> Result<(), MediaCenterError> {
        match self {
            Self::Tv(device) => device.turn_off().await,
            Self::Bluetooth(device) => device.turn_off().await,
            Self::Turntable(device) => device.turn_off().await,
            Self::Printer(device) => device.turn_off().await,
        }
    }

    fn is_on(&self) -> bool {
        match self {
            Self::Tv(device) => device.is_on(),
            Self::Bluetooth(device) => device.is_on(),
            Self::Turntable(device) => device.is_on(),
            Self::Printer(device) => device.is_on(),
        }
    }
}
