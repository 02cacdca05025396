//! Soundbar on its TV input, five-beam surround, cinema DSP.

use std::sync::Arc;

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

use super::{PowerState, PoweredDevice};
use crate::ports::{AmplifierDriver, Clock, DigitalOutput};
use crate::services::amplifier::AmplifierFacade;
use crate::services::relay_bank::Relay;

pub struct Tv<O, A, C> {
    ysp: Relay<O>,
    amplifier: Arc<AmplifierFacade<A, C>>,
    pub(super) power: PowerState,
}

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> Tv<O, A, C> {
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

impl<O: DigitalOutput, A: AmplifierDriver, C: Clock> PoweredDevice for Tv<O, A, C> {
    fn name(&self) -> DeviceName {
        DeviceName::Tv
    }

    #[tracing::instrument(skip(self), fields(device = "tv"))]
    async fn turn_on(&self) -> Result<(), MediaCenterError> {
        self.ysp.on()?;
        self.amplifier.power_on()?;
        self.amplifier.set_input_tv()?;
        self.amplifier.set_five_beam()?;
        self.amplifier.set_dsp_cinema()?;
        self.power.set(true);
        tracing::info!("tv on");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(device = "tv"))]
    async fn turn_off(&self) -> Result<(), MediaCenterError> {
        self.amplifier.power_off().await?;
        self.ysp.off()?;
        self.power.set(false);
        tracing::info!("tv off");
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
    use mediacenter_domain::relay::RelayAddress;

    fn make_tv(rig: &Rig) -> Tv<Output, Driver, TestClock> {
        Tv::new(
            rig.relays.relay(RelayAddress::YSP).unwrap(),
            Arc::clone(&rig.amplifier),
        )
    }

    #[tokio::test]
    async fn should_start_off() {
        let rig = Rig::new();
        assert!(!make_tv(&rig).is_on());
    }

    #[tokio::test]
    async fn should_power_soundbar_for_cinema() {
        let rig = Rig::new();
        let tv = make_tv(&rig);

        tv.turn_on().await.unwrap();

        assert!(tv.is_on());
        assert!(rig.pin_high(6));
        let amp = rig.driver.state();
        assert!(amp.powered);
        assert_eq!(amp.input, Some(Input::Tv));
        assert_eq!(amp.beam, Some(BeamMode::FiveBeam));
        assert_eq!(amp.dsp, Some(DspProgram::Cinema));
        assert_eq!(
            rig.driver.calls(),
            vec!["power_on", "set_input", "set_beam_mode", "set_dsp"]
        );
    }

    #[tokio::test]
    async fn should_settle_before_cutting_supply() {
        let rig = Rig::new();
        let tv = make_tv(&rig);
        tv.turn_on().await.unwrap();

        tv.turn_off().await.unwrap();

        assert!(!tv.is_on());
        assert!(!rig.pin_high(6));
        let amp = rig.driver.state();
        assert!(!amp.powered);
        assert_eq!(amp.input, None);
        assert_eq!(rig.clock.sleeps().len(), 1);
    }

    #[tokio::test]
    async fn should_be_idempotent() {
        let rig = Rig::new();
        let tv = make_tv(&rig);

        tv.turn_on().await.unwrap();
        tv.turn_on().await.unwrap();
        assert!(tv.is_on());
        assert_eq!(rig.output.high_writes(mediacenter_domain::relay::Pin::new(6)), 1);

        tv.turn_off().await.unwrap();
        tv.turn_off().await.unwrap();
        assert!(!tv.is_on());
    }

    #[tokio::test]
    async fn should_keep_supply_and_state_when_power_off_fails() {
        let rig = Rig::new();
        let tv = make_tv(&rig);
        tv.turn_on().await.unwrap();
        rig.driver.fail_power_off(true);

        let err = tv.turn_off().await.unwrap_err();

        assert!(matches!(err, MediaCenterError::Amplifier(_)));
        assert!(tv.is_on());
        assert!(rig.pin_high(6));
    }

    #[tokio::test]
    async fn should_stay_off_when_relay_write_fails() {
        let rig = Rig::new();
        let tv = make_tv(&rig);
        rig.output.fail(true);

        let err = tv.turn_on().await.unwrap_err();

        assert!(matches!(err, MediaCenterError::Hardware(_)));
        assert!(!tv.is_on());
        assert!(rig.driver.calls().is_empty());
    }
}
