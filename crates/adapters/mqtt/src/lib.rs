//! # mediacenter-adapter-mqtt
//!
//! Home Assistant integration over MQTT, using
//! [rumqttc](https://docs.rs/rumqttc).
//!
//! [`MqttPublisher`] implements the
//! [`HomeAssistantPublisher`](mediacenter_app::ports::HomeAssistantPublisher)
//! port with MQTT discovery; [`MqttConnection`] drives the client and turns
//! messages on command topics into
//! [`InboundCommand`](mediacenter_app::ports::home_assistant::InboundCommand)s.
//!
//! ## Dependency rule
//!
//! Depends on `mediacenter-app` (port traits) and `mediacenter-domain` only.

mod config;
mod connection;
mod discovery;
mod error;
mod publisher;
mod topics;

pub use config::MqttConfig;
pub use connection::{MqttConnection, connect};
pub use error::MqttError;
pub use publisher::MqttPublisher;
pub use topics::Topics;
