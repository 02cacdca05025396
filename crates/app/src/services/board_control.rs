//! Board control — bring the whole installation to "all off", and power the
//! host down.

use std::sync::Arc;

use mediacenter_domain::error::MediaCenterError;

use crate::ports::{AmplifierDriver, Clock, DigitalOutput, POWEROFF_COMMAND, Shell};
use crate::services::amplifier::AmplifierFacade;
use crate::services::relay_bank::RelayBank;

pub struct BoardControl<O, A, C, S> {
    relays: Arc<RelayBank<O>>,
    amplifier: Arc<AmplifierFacade<A, C>>,
    shell: S,
}

impl<O, A, C, S> BoardControl<O, A, C, S>
where
    O: DigitalOutput,
    A: AmplifierDriver,
    C: Clock,
    S: Shell,
{
    pub fn new(relays: Arc<RelayBank<O>>, amplifier: Arc<AmplifierFacade<A, C>>, shell: S) -> Self {
        Self {
            relays,
            amplifier,
            shell,
        }
    }

    /// Soft power-off the amplifier, wait for it to settle, then switch every
    /// relay off.
    ///
    /// # Errors
    ///
    /// If the amplifier power-off fails the relays are left as they are and
    /// the amplifier error is returned. Relay failures are returned as
    /// [`MediaCenterError::Hardware`].
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), MediaCenterError> {
        self.amplifier.power_off().await?;
        self.relays.reset()?;
        tracing::info!("board reset");
        Ok(())
    }

    /// [`reset`](Self::reset), then power the host off.
    ///
    /// # Errors
    ///
    /// Returns the reset error; the host is not powered off in that case.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), MediaCenterError> {
        self.reset().await?;
        tracing::warn!("powering the host off");
        self.shell.run(POWEROFF_COMMAND);
        Ok(())
    }
}
