//! MQTT integration configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the Home Assistant MQTT integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Connect to the broker at all.
    pub enabled: bool,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Prefix Home Assistant watches for discovery messages.
    pub discovery_prefix: String,
    /// Prefix for state and command topics.
    pub base_topic: String,
    /// Identity of the controller board in Home Assistant's device registry.
    pub node_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Seconds between two state refreshes.
    pub refresh_secs: u64,
}

impl MqttConfig {
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "mediacenter".to_string(),
            discovery_prefix: "homeassistant".to_string(),
            base_topic: "mediacenter".to_string(),
            node_id: "mediacenter".to_string(),
            keep_alive_secs: 30,
            refresh_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.discovery_prefix, "homeassistant");
        assert_eq!(config.base_topic, "mediacenter");
        assert_eq!(config.keep_alive(), Duration::from_secs(30));
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            enabled = true
            broker_host = "mqtt.example.com"
            broker_port = 8883
            client_id = "living-room"
            discovery_prefix = "ha"
            base_topic = "home/media"
            node_id = "b827eb123456"
            keep_alive_secs = 60
            refresh_secs = 10
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert!(config.enabled);
        assert_eq!(config.broker_host, "mqtt.example.com");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "living-room");
        assert_eq!(config.discovery_prefix, "ha");
        assert_eq!(config.base_topic, "home/media");
        assert_eq!(config.node_id, "b827eb123456");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.refresh_secs, 10);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.node_id, "mediacenter");
    }
}
