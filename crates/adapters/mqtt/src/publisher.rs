//! [`HomeAssistantPublisher`] over an rumqttc client.

use std::sync::Arc;

use rumqttc::{AsyncClient, QoS};

use mediacenter_app::ports::HomeAssistantPublisher;
use mediacenter_app::ports::home_assistant::{EntityDescriptor, EntityKey};
use mediacenter_domain::amplifier::Volume;
use mediacenter_domain::error::MediaCenterError;

use crate::discovery;
use crate::error::MqttError;
use crate::topics::Topics;

const PAYLOAD_ON: &str = "ON";
const PAYLOAD_OFF: &str = "OFF";

/// Publishes discovery and state messages, all retained so Home Assistant
/// picks them up after a restart.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    topics: Arc<Topics>,
}

impl MqttPublisher {
    pub fn new(client: AsyncClient, topics: Arc<Topics>) -> Self {
        Self { client, topics }
    }

    #[must_use]
    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    async fn send(&self, topic: String, payload: impl Into<Vec<u8>>) -> Result<(), MqttError> {
        tracing::trace!(topic = %topic, "publishing");
        self.client
            .publish(topic, QoS::AtLeastOnce, true, payload)
            .await?;
        Ok(())
    }
}

impl HomeAssistantPublisher for MqttPublisher {
    async fn publish_discovery(&self, entity: &EntityDescriptor) -> Result<(), MediaCenterError> {
        let payload = discovery::payload(&self.topics, entity).map_err(MqttError::from)?;
        self.send(self.topics.discovery(entity), payload).await?;
        tracing::debug!(entity = %entity.key, unique_id = %entity.unique_id, "announced entity");
        Ok(())
    }

    async fn publish_switch(&self, key: EntityKey, on: bool) -> Result<(), MediaCenterError> {
        let payload = if on { PAYLOAD_ON } else { PAYLOAD_OFF };
        self.send(self.topics.state(key), payload).await?;
        Ok(())
    }

    async fn publish_number(&self, key: EntityKey, value: Volume) -> Result<(), MediaCenterError> {
        self.send(self.topics.state(key), value.get().to_string())
            .await?;
        Ok(())
    }
}
