//! Amplifier port — command and notification surface of the soundbar driver.

use std::sync::Arc;

use tokio::sync::broadcast;

use mediacenter_domain::amplifier::{AmplifierEvent, BeamMode, DspProgram, Input, Volume};
use mediacenter_domain::error::AmplifierError;

/// Driver for the external amplifier.
///
/// Commands are fire-and-forget: a driver returns once the command has been
/// handed to the device, without waiting for the device to act on it. State
/// the device reports on its own (volume turned on the front panel, power)
/// is pushed through [`subscribe`](Self::subscribe).
pub trait AmplifierDriver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn power_on(&self) -> Result<(), AmplifierError>;

    /// Start the device's own soft power-off sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn power_off(&self) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn set_input(&self, input: Input) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn set_beam_mode(&self, mode: BeamMode) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn set_dsp(&self, program: DspProgram) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn volume_up(&self) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn volume_down(&self) -> Result<(), AmplifierError>;

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    fn set_volume(&self, volume: Volume) -> Result<(), AmplifierError>;

    /// Subscribe to pushed device state. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AmplifierEvent>;

    /// Release the connection. Called once at process exit.
    fn close(&self);
}

impl<T: AmplifierDriver + ?Sized> AmplifierDriver for Arc<T> {
    fn power_on(&self) -> Result<(), AmplifierError> {
        (**self).power_on()
    }

    fn power_off(&self) -> Result<(), AmplifierError> {
        (**self).power_off()
    }

    fn set_input(&self, input: Input) -> Result<(), AmplifierError> {
        (**self).set_input(input)
    }

    fn set_beam_mode(&self, mode: BeamMode) -> Result<(), AmplifierError> {
        (**self).set_beam_mode(mode)
    }

    fn set_dsp(&self, program: DspProgram) -> Result<(), AmplifierError> {
        (**self).set_dsp(program)
    }

    fn volume_up(&self) -> Result<(), AmplifierError> {
        (**self).volume_up()
    }

    fn volume_down(&self) -> Result<(), AmplifierError> {
        (**self).volume_down()
    }

    fn set_volume(&self, volume: Volume) -> Result<(), AmplifierError> {
        (**self).set_volume(volume)
    }

    fn subscribe(&self) -> broadcast::Receiver<AmplifierEvent> {
        (**self).subscribe()
    }

    fn close(&self) {
        (**self).close();
    }
}
