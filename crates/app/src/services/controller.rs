//! Controller — composition root of the control core.
//!
//! Owns the relay bank, the amplifier facade, the device registry and the
//! board and volume controls, and exposes the command table every input
//! (keypad, Home Assistant) is routed through. Dispatches are serialized:
//! one transition runs to completion before the next starts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use mediacenter_domain::action::Action;
use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::{MediaCenterError, UnknownDeviceError, ValidationError};
use mediacenter_domain::relay::RelayAddress;

use crate::ports::{AmplifierDriver, Clock, DigitalOutput, Shell};
use crate::services::amplifier::AmplifierFacade;
use crate::services::board_control::BoardControl;
use crate::services::devices::{
    BluetoothStreamer, LogicalDevice, PoweredDevice, Printer, Tv, Turntable,
};
use crate::services::relay_bank::RelayBank;
use crate::services::volume_control::VolumeControl;

pub struct Controller<O, A, C, S> {
    relays: Arc<RelayBank<O>>,
    amplifier: Arc<AmplifierFacade<A, C>>,
    devices: BTreeMap<DeviceName, LogicalDevice<O, A, C>>,
    volume: VolumeControl<A, C>,
    board: BoardControl<O, A, C, S>,
    dispatch_lock: Mutex<()>,
}

impl<O, A, C, S> Controller<O, A, C, S>
where
    O: DigitalOutput,
    A: AmplifierDriver,
    C: Clock,
    S: Shell,
{
    /// Build the device registry on top of `relays` and `amplifier`.
    ///
    /// # Errors
    ///
    /// Returns [`MediaCenterError::UnknownRelay`] if the bank is too small
    /// for the relay map.
    pub fn new(
        relays: Arc<RelayBank<O>>,
        amplifier: Arc<AmplifierFacade<A, C>>,
        shell: S,
    ) -> Result<Self, MediaCenterError> {
        let ysp = relays.relay(RelayAddress::YSP)?;
        let devices = BTreeMap::from([
            (
                DeviceName::Tv,
                LogicalDevice::Tv(Tv::new(ysp.clone(), Arc::clone(&amplifier))),
            ),
            (
                DeviceName::Bt,
                LogicalDevice::Bluetooth(BluetoothStreamer::new(
                    ysp.clone(),
                    Arc::clone(&amplifier),
                )),
            ),
            (
                DeviceName::Turntable,
                LogicalDevice::Turntable(Turntable::new(
                    ysp,
                    relays.relay(RelayAddress::TURNTABLE)?,
                    Arc::clone(&amplifier),
                )),
            ),
            (
                DeviceName::Printer,
                LogicalDevice::Printer(Printer::new(relays.relay(RelayAddress::PRINTER)?)),
            ),
        ]);

        Ok(Self {
            volume: VolumeControl::new(Arc::clone(&amplifier)),
            board: BoardControl::new(Arc::clone(&relays), Arc::clone(&amplifier), shell),
            relays,
            amplifier,
            devices,
            dispatch_lock: Mutex::new(()),
        })
    }

    /// Look up exactly the requested devices.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownDeviceError`] naming the first unknown name.
    pub fn devices<I>(
        &self,
        names: I,
    ) -> Result<HashMap<DeviceName, &LogicalDevice<O, A, C>>, UnknownDeviceError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name: DeviceName = name.as_ref().parse()?;
                self.devices
                    .get(&name)
                    .map(|device| (name, device))
                    .ok_or_else(|| UnknownDeviceError {
                        name: name.to_string(),
                    })
            })
            .collect()
    }

    #[must_use]
    pub fn device(&self, name: DeviceName) -> Option<&LogicalDevice<O, A, C>> {
        self.devices.get(&name)
    }

    /// Symbolic name to action, for every command the controller accepts.
    #[must_use]
    pub fn command_table() -> BTreeMap<&'static str, Action> {
        Action::ALL
            .into_iter()
            .map(|action| (action.name(), action))
            .collect()
    }

    /// Execute one action, waiting for any in-flight action to finish first.
    ///
    /// `argument` is only used by [`Action::VolumeSet`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingArgument`] for `volume_set` without
    /// a volume, or whatever the underlying device or control reports.
    #[tracing::instrument(skip(self), fields(action = %action))]
    pub async fn dispatch(
        &self,
        action: Action,
        argument: Option<Volume>,
    ) -> Result<(), MediaCenterError> {
        let _guard = self.dispatch_lock.lock().await;

        match action {
            Action::TvOn => self.power(DeviceName::Tv, true).await?,
            Action::TvOff => self.power(DeviceName::Tv, false).await?,
            Action::TurntableOn => self.power(DeviceName::Turntable, true).await?,
            Action::TurntableOff => self.power(DeviceName::Turntable, false).await?,
            Action::StreamingOn => self.power(DeviceName::Bt, true).await?,
            Action::StreamingOff => self.power(DeviceName::Bt, false).await?,
            Action::PrinterOn => self.power(DeviceName::Printer, true).await?,
            Action::PrinterOff => self.power(DeviceName::Printer, false).await?,
            Action::Off => {
                self.board.reset().await?;
                self.mark_all_off();
            }
            Action::Shutdown => {
                self.board.shutdown().await?;
                self.mark_all_off();
            }
            Action::VolumeUp => self.volume.increase()?,
            Action::VolumeDown => self.volume.decrease()?,
            Action::VolumeSet => {
                let volume = argument.ok_or(ValidationError::MissingArgument {
                    action: Action::VolumeSet.name(),
                })?;
                self.volume.set(volume)?;
            }
        }
        Ok(())
    }

    /// Parse a command-table name and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAction`] for a name outside the
    /// command table, otherwise see [`dispatch`](Self::dispatch).
    pub async fn execute(
        &self,
        name: &str,
        argument: Option<Volume>,
    ) -> Result<(), MediaCenterError> {
        let action: Action = name.parse()?;
        self.dispatch(action, argument).await
    }

    /// Reset the board and power the host off.
    ///
    /// # Errors
    ///
    /// See [`BoardControl::shutdown`].
    pub async fn shutdown(&self) -> Result<(), MediaCenterError> {
        self.dispatch(Action::Shutdown, None).await
    }

    /// Wait for the in-flight dispatch, if any, and keep new ones from
    /// starting while the guard is held.
    pub async fn hold_dispatch(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    #[must_use]
    pub fn relays(&self) -> &Arc<RelayBank<O>> {
        &self.relays
    }

    #[must_use]
    pub fn amplifier(&self) -> &Arc<AmplifierFacade<A, C>> {
        &self.amplifier
    }

    #[must_use]
    pub fn volume_control(&self) -> &VolumeControl<A, C> {
        &self.volume
    }

    async fn power(&self, name: DeviceName, on: bool) -> Result<(), MediaCenterError> {
        let device = self.devices.get(&name).ok_or_else(|| UnknownDeviceError {
            name: name.to_string(),
        })?;
        if on {
            device.turn_on().await
        } else {
            device.turn_off().await
        }
    }

    fn mark_all_off(&self) {
        for device in self.devices.values() {
            device.force_off();
        }
    }
}
