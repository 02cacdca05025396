//! Home Assistant bridge — mirrors device state to Home Assistant and routes
//! its switch and slider commands into the command table.
//!
//! Every entity remembers the last value published for it; a value is only
//! sent again once it changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};

use mediacenter_domain::action::Action;
use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

use crate::ports::home_assistant::{DeviceInfo, EntityDescriptor, EntityKey, InboundCommand};
use crate::ports::{AmplifierDriver, Clock, DigitalOutput, HomeAssistantPublisher, Shell};
use crate::services::controller::Controller;
use crate::services::devices::PoweredDevice;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Devices with a power switch in Home Assistant.
pub const BRIDGED_SWITCHES: [DeviceName; 3] =
    [DeviceName::Tv, DeviceName::Turntable, DeviceName::Printer];

/// Devices with a volume slider in Home Assistant.
pub const BRIDGED_VOLUMES: [DeviceName; 2] = [DeviceName::Tv, DeviceName::Turntable];

const PAYLOAD_ON: &str = "ON";
const PAYLOAD_OFF: &str = "OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Published {
    Switch(bool),
    Number(Volume),
}

/// Every entity the bridge announces, with `node_id` as the identity of the
/// controller board.
#[must_use]
pub fn entities(node_id: &str) -> Vec<EntityDescriptor> {
    let board = DeviceInfo {
        identifier: node_id.to_string(),
        name: "Media Controller".to_string(),
        model: "Very Smart Outlet v2".to_string(),
        manufacturer: "Straight hands, Ltd".to_string(),
        via_device: None,
    };

    let mut entities = vec![EntityDescriptor {
        key: EntityKey::BoardPower,
        name: "Power",
        unique_id: format!("{node_id}-outlet"),
        device_class: Some("outlet"),
        device: board,
    }];

    for name in BRIDGED_SWITCHES {
        entities.push(EntityDescriptor {
            key: EntityKey::Power(name),
            name: "Power",
            unique_id: format!("{node_id}-{name}-switch"),
            device_class: Some("switch"),
            device: device_info(node_id, name),
        });
    }
    for name in BRIDGED_VOLUMES {
        entities.push(EntityDescriptor {
            key: EntityKey::Volume(name),
            name: "Volume",
            unique_id: format!("{node_id}-{name}-vol"),
            device_class: None,
            device: device_info(node_id, name),
        });
    }
    entities
}

fn device_info(node_id: &str, name: DeviceName) -> DeviceInfo {
    let (display, model, manufacturer) = match name {
        DeviceName::Tv => ("TV", "-", "-"),
        DeviceName::Bt => ("Bluetooth", "-", "-"),
        DeviceName::Turntable => ("Turntable", "-", "-"),
        DeviceName::Printer => ("Printer", "1700n", "Dell"),
    };
    DeviceInfo {
        identifier: format!("{node_id}-{name}"),
        name: display.to_string(),
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        via_device: Some(node_id.to_string()),
    }
}

pub struct HomeAssistantBridge<P, O, A, C, S> {
    publisher: P,
    controller: Arc<Controller<O, A, C, S>>,
    entities: Vec<EntityDescriptor>,
    published: Mutex<HashMap<EntityKey, Published>>,
}

impl<P, O, A, C, S> HomeAssistantBridge<P, O, A, C, S>
where
    P: HomeAssistantPublisher,
    O: DigitalOutput,
    A: AmplifierDriver,
    C: Clock,
    S: Shell,
{
    pub fn new(publisher: P, controller: Arc<Controller<O, A, C, S>>, node_id: &str) -> Self {
        Self {
            publisher,
            controller,
            entities: entities(node_id),
            published: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Announce every entity, then publish the boot state: board on,
    /// devices off, volumes zero.
    ///
    /// # Errors
    ///
    /// Returns the first publisher error.
    #[tracing::instrument(skip(self))]
    pub async fn announce(&self) -> Result<(), MediaCenterError> {
        for entity in &self.entities {
            self.publisher.publish_discovery(entity).await?;
        }
        self.set_switch(EntityKey::BoardPower, true).await?;
        for name in BRIDGED_SWITCHES {
            self.set_switch(EntityKey::Power(name), false).await?;
        }
        self.zero_volumes().await?;
        tracing::info!(entities = self.entities.len(), "home assistant entities announced");
        Ok(())
    }

    /// Publish current device power states and amplifier volume.
    ///
    /// # Errors
    ///
    /// Returns the first publisher error.
    pub async fn refresh(&self) -> Result<(), MediaCenterError> {
        for name in BRIDGED_VOLUMES {
            if let Some(volume) = self.controller.device(name).and_then(|d| d.volume()) {
                self.set_number(EntityKey::Volume(name), volume).await?;
            }
        }
        for name in BRIDGED_SWITCHES {
            if let Some(device) = self.controller.device(name) {
                self.set_switch(EntityKey::Power(name), device.is_on()).await?;
            }
        }
        Ok(())
    }

    /// Route one inbound command. Payloads that mean nothing for the entity
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns the dispatch error, or a publisher error.
    #[tracing::instrument(skip(self, command), fields(entity = %command.key, payload = %command.payload))]
    pub async fn handle(&self, command: InboundCommand) -> Result<(), MediaCenterError> {
        let payload = command.payload.trim();
        match command.key {
            EntityKey::BoardPower => match payload {
                PAYLOAD_OFF => {
                    self.set_switch(EntityKey::BoardPower, false).await?;
                    self.controller.shutdown().await?;
                    self.zero_volumes().await?;
                }
                PAYLOAD_ON => tracing::debug!("board cannot power itself on"),
                _ => tracing::debug!("ignoring board payload"),
            },
            EntityKey::Power(name) if BRIDGED_SWITCHES.contains(&name) => match payload {
                PAYLOAD_ON => {
                    self.controller.dispatch(Action::power(name, true), None).await?;
                    self.set_switch(command.key, true).await?;
                }
                PAYLOAD_OFF => {
                    self.controller.dispatch(Action::power(name, false), None).await?;
                    self.set_switch(command.key, false).await?;
                    self.zero_volumes().await?;
                }
                _ => tracing::debug!("ignoring switch payload"),
            },
            EntityKey::Volume(name) if BRIDGED_VOLUMES.contains(&name) => {
                match payload.parse::<Volume>() {
                    Ok(volume) => {
                        self.controller
                            .dispatch(Action::VolumeSet, Some(volume))
                            .await?;
                    }
                    Err(err) => tracing::debug!(%err, "ignoring volume payload"),
                }
            }
            _ => tracing::debug!("entity is not bridged"),
        }
        Ok(())
    }

    /// Announce, then keep Home Assistant in sync until `commands` closes.
    ///
    /// State is refreshed every `interval` and right after the amplifier
    /// reports a new volume. Failures are logged and the loop carries on.
    pub async fn run(&self, interval: Duration, mut commands: mpsc::Receiver<InboundCommand>) {
        if let Err(err) = self.announce().await {
            tracing::error!(error = %err, "failed to announce home assistant entities");
        }

        let volume_changed = Arc::new(Notify::new());
        let notify = Arc::clone(&volume_changed);
        let _subscription = self.controller.amplifier().subscribe_volume(move |_| {
            notify.notify_one();
            Ok(())
        });

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh_logged().await,
                () = volume_changed.notified() => self.refresh_logged().await,
                command = commands.recv() => match command {
                    Some(command) => {
                        if let Err(err) = self.handle(command).await {
                            tracing::error!(error = %err, "home assistant command failed");
                        }
                    }
                    None => {
                        tracing::info!("home assistant command stream closed");
                        break;
                    }
                },
            }
        }
    }

    async fn refresh_logged(&self) {
        if let Err(err) = self.refresh().await {
            tracing::error!(error = %err, "error updating home assistant state");
        }
    }

    async fn zero_volumes(&self) -> Result<(), MediaCenterError> {
        for name in BRIDGED_VOLUMES {
            self.set_number(EntityKey::Volume(name), Volume::MIN).await?;
        }
        Ok(())
    }

    async fn set_switch(&self, key: EntityKey, on: bool) -> Result<(), MediaCenterError> {
        if self.unchanged(key, Published::Switch(on)) {
            return Ok(());
        }
        self.publisher.publish_switch(key, on).await?;
        self.remember(key, Published::Switch(on));
        Ok(())
    }

    async fn set_number(&self, key: EntityKey, value: Volume) -> Result<(), MediaCenterError> {
        if self.unchanged(key, Published::Number(value)) {
            return Ok(());
        }
        self.publisher.publish_number(key, value).await?;
        self.remember(key, Published::Number(value));
        Ok(())
    }

    fn unchanged(&self, key: EntityKey, value: Published) -> bool {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            == Some(&value)
    }

    fn remember(&self, key: EntityKey, value: Published) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}
