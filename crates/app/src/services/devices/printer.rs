//! A single relay, no audio.

use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

use super::{PowerState, PoweredDevice};
use crate::ports::DigitalOutput;
use crate::services::relay_bank::Relay;

pub struct Printer<O> {
    relay: Relay<O>,
    pub(super) power: PowerState,
}

impl<O: DigitalOutput> Printer<O> {
    pub fn new(relay: Relay<O>) -> Self {
        Self {
            relay,
            power: PowerState::default(),
        }
    }
}

impl<O: DigitalOutput> PoweredDevice for Printer<O> {
    fn name(&self) -> DeviceName {
        DeviceName::Printer
    }

    async fn turn_on(&self) -> Result<(), MediaCenterError> {
        self.relay.on()?;
        self.power.set(true);
        tracing::info!(device = "printer", "printer on");
        Ok(())
    }

    async fn turn_off(&self) -> Result<(), MediaCenterError> {
        self.relay.off()?;
        self.power.set(false);
        tracing::info!(device = "printer", "printer off");
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.power.get()
    }
}
