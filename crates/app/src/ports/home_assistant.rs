//! Home Assistant port — entity descriptors and the publisher the bridge
//! pushes state through.
//!
//! The bridge service decides *what* to publish and when; the adapter decides
//! how it looks on the wire (topics, discovery JSON).

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::device::DeviceName;
use mediacenter_domain::error::MediaCenterError;

/// Home Assistant component kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Switch,
    Number,
}

impl Component {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Number => "number",
        }
    }
}

/// Identity of a bridged entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    /// Power outlet of the controller board itself.
    BoardPower,
    /// Power switch of a logical device.
    Power(DeviceName),
    /// Volume slider of an audio device.
    Volume(DeviceName),
}

impl EntityKey {
    #[must_use]
    pub fn component(self) -> Component {
        match self {
            Self::BoardPower | Self::Power(_) => Component::Switch,
            Self::Volume(_) => Component::Number,
        }
    }

    /// Stable slug used in unique ids and topics (`tv_power`, `board_power`).
    #[must_use]
    pub fn object_id(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardPower => f.write_str("board_power"),
            Self::Power(device) => write!(f, "{device}_power"),
            Self::Volume(device) => write!(f, "{device}_volume"),
        }
    }
}

impl FromStr for EntityKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "board_power" {
            return Ok(Self::BoardPower);
        }
        if let Some(device) = s.strip_suffix("_power") {
            return device.parse().map(Self::Power).map_err(|_| ());
        }
        if let Some(device) = s.strip_suffix("_volume") {
            return device.parse().map(Self::Volume).map_err(|_| ());
        }
        Err(())
    }
}

/// Device registry entry entities are grouped under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    /// Parent device, for devices reached through the controller board.
    pub via_device: Option<String>,
}

/// Everything needed to announce one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub key: EntityKey,
    pub name: &'static str,
    pub unique_id: String,
    pub device_class: Option<&'static str>,
    pub device: DeviceInfo,
}

/// A command Home Assistant sent for an entity, payload still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub key: EntityKey,
    pub payload: String,
}

/// Outbound half of the Home Assistant connection.
pub trait HomeAssistantPublisher: Send + Sync {
    /// Announce an entity so Home Assistant creates it.
    fn publish_discovery(
        &self,
        entity: &EntityDescriptor,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send;

    /// Publish the state of a switch entity.
    fn publish_switch(
        &self,
        key: EntityKey,
        on: bool,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send;

    /// Publish the value of a number entity.
    fn publish_number(
        &self,
        key: EntityKey,
        value: Volume,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send;
}

impl<T: HomeAssistantPublisher + ?Sized> HomeAssistantPublisher for Arc<T> {
    fn publish_discovery(
        &self,
        entity: &EntityDescriptor,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        (**self).publish_discovery(entity)
    }

    fn publish_switch(
        &self,
        key: EntityKey,
        on: bool,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        (**self).publish_switch(key, on)
    }

    fn publish_number(
        &self,
        key: EntityKey,
        value: Volume,
    ) -> impl Future<Output = Result<(), MediaCenterError>> + Send {
        (**self).publish_number(key, value)
    }
}
