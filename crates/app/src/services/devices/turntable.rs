//! Turntable — its own supply relay plus the soundbar on AUX1 in stereo.

use std::sync::Arc;

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

use super::{PowerState, PoweredDevice};
use crate::ports::{AmplifierDriver, Clock, DigitalOutput};
use crate::services::amplifier::AmplifierFacade;
use crate::services::relay_bank::Relay;

pub struct Turntable<O, A, C> {
    ysp: Relay<O>,
    turntable: Relay<O>,
    amplifier: Arc<AmplifierFacade<A, C>>,
    pub(super) power: PowerState,
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> Turntable<O, A, C> {
    pub fn new(ysp: Relay<O>, turntable: Relay<O>, amplifier: Arc<AmplifierFacade<A, C>>) -> Self {
        Self {
            ysp,
            turntable,
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

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> PoweredDevice for Turntable<O, A, C> {
    fn name(&self) -> DeviceName {
        DeviceName::Turntable
    }

    #[tracing::instrument(skip(self), fields(device = "turntable"))]
    async fn turn_on(&self) -> Result<(), MediaCenterError> {
        self.ysp.on()?;
        self.turntable.on()?;
        self.amplifier.power_on()?;
        self.amplifier.set_input_aux1()?;
        self.amplifier.set_dsp_off()?;
        self.amplifier.set_stereo()?;
        self.power.set(true);
        tracing::info!("turntable on");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(device = "turntable"))]
    async fn turn_off(&self) -> Result<(), MediaCenterError> {
        self.amplifier.power_off().await?;
        self.turntable.off()?;
        self.ysp.off()?;
        self.power.set(false);
        tracing::info!("turntable off");
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.power.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::devices::fixtures::{Driver, Output, Rig, TestClock};
    use mediacenter_domain::amplifier::{BeamMode, DspProgram, Input};
    use mediacenter_domain::relay::{Pin, RelayAddress};

    fn make_turntable(rig: &Rig) -> Turntable<Output, Driver, TestClock> {
        Turntable::new(
            rig.relays.relay(RelayAddress::YSP).unwrap(),
            rig.relays.relay(RelayAddress::TURNTABLE).unwrap(),
            Arc::clone(&rig.amplifier),
        )
    }

    #[tokio::test]
    async fn should_power_both_relays_and_select_aux() {
        let rig = Rig::new();
        let turntable = make_turntable(&rig);

        turntable.turn_on().await.unwrap();

        assert!(turntable.is_on());
        assert!(rig.pin_high(6));
        assert!(rig.pin_high(19));
        let amp = rig.driver.state();
        assert_eq!(amp.input, Some(Input::Aux1));
        assert_eq!(amp.dsp, Some(DspProgram::Off));
        assert_eq!(amp.beam, Some(BeamMode::Stereo));
    }

    #[tokio::test]
    async fn should_leave_printer_relay_untouched() {
        let rig = Rig::new();
        let turntable = make_turntable(&rig);

        turntable.turn_on().await.unwrap();
        turntable.turn_off().await.unwrap();

        assert!(!rig.pin_high(26));
        assert_eq!(rig.output.high_writes(Pin::new(26)), 0);
        assert_eq!(rig.output.low_writes(Pin::new(26)), 0);
    }

    #[tokio::test]
    async fn should_cut_both_relays_after_settle() {
        let rig = Rig::new();
        let turntable = make_turntable(&rig);
        turntable.turn_on().await.unwrap();

        turntable.turn_off().await.unwrap();

        assert!(!turntable.is_on());
        assert!(!rig.pin_high(6));
        assert!(!rig.pin_high(19));
        assert_eq!(rig.clock.sleeps().len(), 1);
    }

    #[tokio::test]
    async fn should_keep_relays_energized_when_power_off_fails() {
        let rig = Rig::new();
        let turntable = make_turntable(&rig);
        turntable.turn_on().await.unwrap();
        rig.driver.fail_power_off(true);

        assert!(turntable.turn_off().await.is_err());

        assert!(turntable.is_on());
        assert!(rig.pin_high(6));
        assert!(rig.pin_high(19));
    }
}
