//! Home Assistant MQTT discovery payloads.

use serde::Serialize;

use mediacenter_app::ports::home_assistant::{Component, DeviceInfo, EntityDescriptor};
use mediacenter_domain::amplifier::Volume;

use crate::topics::Topics;

#[derive(Debug, Serialize)]
struct DiscoveryPayload<'a> {
    name: &'a str,
    unique_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_class: Option<&'a str>,
    state_topic: String,
    command_topic: String,
    #[serde(flatten)]
    range: Option<NumberRange>,
    device: DevicePayload<'a>,
}

/// Slider bounds of number entities.
#[derive(Debug, Serialize)]
struct NumberRange {
    min: u8,
    max: u8,
    step: u8,
    mode: &'static str,
}

#[derive(Debug, Serialize)]
struct DevicePayload<'a> {
    identifiers: [&'a str; 1],
    name: &'a str,
    model: &'a str,
    manufacturer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    via_device: Option<&'a str>,
}

impl<'a> From<&'a DeviceInfo> for DevicePayload<'a> {
    fn from(device: &'a DeviceInfo) -> Self {
        Self {
            identifiers: [device.identifier.as_str()],
            name: &device.name,
            model: &device.model,
            manufacturer: &device.manufacturer,
            via_device: device.via_device.as_deref(),
        }
    }
}

/// JSON config announcing `entity`.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the payload cannot be encoded.
pub fn payload(topics: &Topics, entity: &EntityDescriptor) -> Result<Vec<u8>, serde_json::Error> {
    let range = match entity.key.component() {
        Component::Switch => None,
        Component::Number => Some(NumberRange {
            min: Volume::MIN.get(),
            max: Volume::MAX.get(),
            step: 1,
            mode: "slider",
        }),
    };
    serde_json::to_vec(&DiscoveryPayload {
        name: entity.name,
        unique_id: &entity.unique_id,
        device_class: entity.device_class,
        state_topic: topics.state(entity.key),
        command_topic: topics.command(entity.key),
        range,
        device: DevicePayload::from(&entity.device),
    })
}

#[cfg(test)]
mod tests {
    use mediacenter_app::ports::home_assistant::EntityKey;
    use mediacenter_app::services::home_assistant::entities;
    use mediacenter_domain::device::DeviceName;
    use serde_json::{Value, json};

    use super::*;

    fn decode(key: EntityKey) -> Value {
        let topics = Topics::new("homeassistant", "mediacenter");
        let entity = entities("node")
            .into_iter()
            .find(|entity| entity.key == key)
            .unwrap();
        serde_json::from_slice(&payload(&topics, &entity).unwrap()).unwrap()
    }

    #[test]
    fn should_describe_board_outlet() {
        let value = decode(EntityKey::BoardPower);

        assert_eq!(
            value,
            json!({
                "name": "Power",
                "unique_id": "node-outlet",
                "device_class": "outlet",
                "state_topic": "mediacenter/board_power/state",
                "command_topic": "mediacenter/board_power/set",
                "device": {
                    "identifiers": ["node"],
                    "name": "Media Controller",
                    "model": "Very Smart Outlet v2",
                    "manufacturer": "Straight hands, Ltd",
                },
            })
        );
    }

    #[test]
    fn should_attach_devices_to_the_board() {
        let value = decode(EntityKey::Power(DeviceName::Printer));

        assert_eq!(value["device"]["via_device"], "node");
        assert_eq!(value["device"]["model"], "1700n");
        assert!(value.get("min").is_none());
    }

    #[test]
    fn should_describe_volume_slider() {
        let value = decode(EntityKey::Volume(DeviceName::Turntable));

        assert_eq!(value["unique_id"], "node-turntable-vol");
        assert_eq!(value["min"], 0);
        assert_eq!(value["max"], 100);
        assert_eq!(value["step"], 1);
        assert_eq!(value["mode"], "slider");
        assert!(value.get("device_class").is_none());
    }
}
