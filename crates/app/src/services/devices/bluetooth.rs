//! Bluetooth streamer, wired to the soundbar's TV input and played in stereo.

use std::sync::Arc;

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

use super::{PowerState, PoweredDevice};
use crate::ports::{AmplifierDriver, Clock, DigitalOutput};
use crate::services::amplifier::AmplifierFacade;
use crate::services::relay_bank::Relay;

pub struct BluetoothStreamer<O, A, C> {
    ysp: Relay<O>,
    amplifier: Arc<AmplifierFacade<A, C>>,
    pub(super) power: PowerState,
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> BluetoothStreamer<O, A, C> {
    pub fn new(ysp: Relay<O>, amplifier: Arc<AmplifierFacade<A, C>>) -> Self {
        Self {
            ysp,
            amplifier,
            power: PowerState::default(),
        }
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.amplifier.volume()
    }

    /// # Errors
    ///
    /// Returns the amplifier error if the command cannot be delivered.
    pub fn set_volume(&self, volume: Volume) -> Result<(), MediaCenterError> {
        Ok(self.amplifier.set_volume(volume)?)
    }
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> PoweredDevice for BluetoothStreamer<O, A, C> {
    fn name(&self) -> DeviceName {
        DeviceName::Bt
    }

    #[tracing::instrument(skip(self), fields(device = "bt"))]
    async fn turn_on(&self) -> Result<(), MediaCenterError> {
        self.ysp.on()?;
        self.amplifier.power_on()?;
        self.amplifier.set_input_tv()?;
        self.amplifier.set_dsp_off()?;
        self.amplifier.set_stereo()?;
        self.power.set(true);
        tracing::info!("streaming on");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(device = "bt"))]
    async fn turn_off(&self) -> Result<(), MediaCenterError> {
        self.amplifier.power_off().await?;
        self.ysp.off()?;
        self.power.set(false);
        tracing::info!("streaming off");
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.power.get()
    }
}
