//! Broker connection: drives the rumqttc event loop and routes Home
//! Assistant commands to the bridge.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use tokio::sync::mpsc;

use mediacenter_app::ports::home_assistant::InboundCommand;

use crate::config::MqttConfig;
use crate::publisher::MqttPublisher;
use crate::topics::Topics;

const REQUEST_CAPACITY: usize = 64;
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Create the publisher and its connection from `config`.
///
/// Nothing touches the network until [`MqttConnection::run`] is polled.
#[must_use]
pub fn connect(config: &MqttConfig) -> (MqttPublisher, MqttConnection) {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(config.keep_alive());

    let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
    let topics = Arc::new(Topics::new(
        config.discovery_prefix.clone(),
        config.base_topic.clone(),
    ));
    let publisher = MqttPublisher::new(client.clone(), Arc::clone(&topics));
    let connection = MqttConnection {
        client,
        event_loop,
        topics,
    };
    (publisher, connection)
}

pub struct MqttConnection {
    client: AsyncClient,
    event_loop: EventLoop,
    topics: Arc<Topics>,
}

impl MqttConnection {
    /// Poll the broker connection, forwarding commands to `commands`, until
    /// the receiving side goes away.
    ///
    /// Connection errors are logged and retried after a delay; rumqttc
    /// reconnects on the next poll.
    pub async fn run(mut self, commands: mpsc::Sender<InboundCommand>) {
        loop {
            tokio::select! {
                biased;
                () = commands.closed() => {
                    tracing::info!("MQTT command receiver gone, stopping");
                    break;
                }
                event = self.event_loop.poll() => match event {
                    Ok(Event::Incoming(Incoming::ConnAck(ack))) => {
                        tracing::info!(code = ?ack.code, "MQTT connected");
                        subscribe(&self.client, &self.topics);
                    }
                    Ok(Event::Incoming(Incoming::Publish(publish))) => {
                        let Some(command) = route(&self.topics, &publish.topic, &publish.payload)
                        else {
                            continue;
                        };
                        if commands.send(command).await.is_err() {
                            break;
                        }
                    }
                    Ok(Event::Incoming(Incoming::Disconnect)) => {
                        tracing::warn!("MQTT broker disconnected");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "MQTT connection error, retrying");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                },
            }
        }
    }
}

fn subscribe(client: &AsyncClient, topics: &Topics) {
    let filter = topics.command_filter();
    // the request queue is drained by this very loop, so never wait on it
    match client.try_subscribe(filter.as_str(), QoS::AtLeastOnce) {
        Ok(()) => tracing::debug!(filter = %filter, "subscribed to commands"),
        Err(err) => tracing::warn!(error = %err, filter = %filter, "command subscription failed"),
    }
}

/// Command carried by a message on `topic`; `None` for topics outside the
/// command layout and payloads that are not UTF-8.
pub(crate) fn route(topics: &Topics, topic: &str, payload: &[u8]) -> Option<InboundCommand> {
    let Some(key) = topics.parse_command(topic) else {
        tracing::debug!(topic, "ignoring message on unknown topic");
        return None;
    };
    let Ok(payload) = std::str::from_utf8(payload) else {
        tracing::debug!(topic, "ignoring non UTF-8 payload");
        return None;
    };
    Some(InboundCommand {
        key,
        payload: payload.trim().to_string(),
    })
}
