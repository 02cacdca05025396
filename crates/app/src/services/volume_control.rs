//! Amplifier volume, independent of which source is playing.

use std::sync::Arc;

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::error::AmplifierError;

use crate::ports::{AmplifierDriver, Clock};
use crate::services::amplifier::AmplifierFacade;

pub struct VolumeControl<A, C> {
    amplifier: Arc<AmplifierFacade<A, C>>,
}

impl<A: AmplifierDriver, C: Clock> VolumeControl<A, C> {
    pub fn new(amplifier: Arc<AmplifierFacade<A, C>>) -> Self {
        Self { amplifier }
    }

    /// One step up.
    ///
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn increase(&self) -> Result<(), AmplifierError> {
        self.amplifier.volume_up()
    }

    /// One step down.
    ///
    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn decrease(&self) -> Result<(), AmplifierError> {
        self.amplifier.volume_down()
    }

    /// # Errors
    ///
    /// Returns [`AmplifierError`] if the command cannot be delivered.
    pub fn set(&self, volume: Volume) -> Result<(), AmplifierError> {
        self.amplifier.set_volume(volume)
    }

    /// Cached level, as last reported by the amplifier.
    #[must_use]
    pub fn level(&self) -> Volume {
        self.amplifier.volume()
    }
}
