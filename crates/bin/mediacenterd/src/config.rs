//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `mediacenter.toml` in the working directory, or the file named
//! by `MEDIACENTER_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use mediacenter_adapter_gpio::DEFAULT_SYSFS_ROOT;
use mediacenter_adapter_keypad::DEFAULT_DEVICE;
use mediacenter_adapter_mqtt::MqttConfig;
use mediacenter_app::keymap::Keymap;
use mediacenter_app::services::amplifier::DEFAULT_SETTLE_DELAY;
use mediacenter_domain::relay::{DEFAULT_RELAY_PINS, Pin, RelayAddress};

const DEFAULT_PATH: &str = "mediacenter.toml";

/// The soundbar needs a full second after soft power-off before its supply
/// relay may be cut.
const MIN_SETTLE_MS: u64 = 1000;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Relay HAT settings.
    pub relays: RelaysConfig,
    /// Soundbar settings.
    pub amplifier: AmplifierConfig,
    /// Numeric keypad settings.
    pub keypad: KeypadConfig,
    /// Host shell settings.
    pub shell: ShellConfig,
    /// Home Assistant over MQTT.
    pub mqtt: MqttConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Where relay pins are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayBackend {
    /// Linux sysfs GPIO.
    Sysfs,
    /// In-memory pins, for running off the Raspberry Pi.
    Virtual,
}

/// Relay HAT configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelaysConfig {
    pub backend: RelayBackend,
    /// sysfs GPIO root, only used by the `sysfs` backend.
    pub sysfs_root: String,
    /// BCM pin of each relay, relay 1 first.
    pub pins: Vec<u8>,
}

/// Soundbar configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AmplifierConfig {
    /// Pause after power-off before the relay is cut, in milliseconds.
    pub settle_ms: u64,
}

/// Keypad configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeypadConfig {
    pub enabled: bool,
    /// Input event device of the keypad.
    pub device: String,
    /// Key name to action name, applied on top of the default layout.
    pub bindings: BTreeMap<String, String>,
}

/// Host shell configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Log host commands instead of running them.
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from `mediacenter.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MEDIACENTER_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MEDIACENTER_RELAY_BACKEND") {
            match val.as_str() {
                "sysfs" => self.relays.backend = RelayBackend::Sysfs,
                "virtual" => self.relays.backend = RelayBackend::Virtual,
                other => tracing::warn!(backend = other, "ignoring unknown relay backend"),
            }
        }
        if let Some(val) = var("MEDIACENTER_KEYPAD_DEVICE") {
            self.keypad.device = val;
        }
        if let Some(val) = var("MEDIACENTER_DRY_RUN") {
            self.shell.dry_run = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Some(val) = var("MEDIACENTER_MQTT_HOST") {
            self.mqtt.enabled = true;
            self.mqtt.broker_host = val;
        }
        if let Some(port) = var("MEDIACENTER_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("MEDIACENTER_MQTT_NODE_ID") {
            self.mqtt.node_id = val;
        }
        if let Some(val) = var("MEDIACENTER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let needed = usize::from(RelayAddress::PRINTER.get());
        if self.relays.pins.len() < needed {
            return Err(ConfigError::Validation(format!(
                "at least {needed} relay pins are required"
            )));
        }
        let distinct: BTreeSet<_> = self.relays.pins.iter().collect();
        if distinct.len() != self.relays.pins.len() {
            return Err(ConfigError::Validation(
                "relay pins must be distinct".to_string(),
            ));
        }
        if self.amplifier.settle_ms < MIN_SETTLE_MS {
            return Err(ConfigError::Validation(format!(
                "amplifier settle_ms must be at least {MIN_SETTLE_MS}"
            )));
        }
        self.keymap()?;
        if self.mqtt.enabled {
            if self.mqtt.node_id.is_empty() {
                return Err(ConfigError::Validation(
                    "mqtt node_id must not be empty".to_string(),
                ));
            }
            if self.mqtt.refresh_secs == 0 {
                return Err(ConfigError::Validation(
                    "mqtt refresh_secs must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Relay pins in address order.
    pub fn relay_pins(&self) -> impl Iterator<Item = Pin> + '_ {
        self.relays.pins.iter().copied().map(Pin::new)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.amplifier.settle_ms)
    }

    /// Default keypad layout with the configured bindings applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a binding names an unknown
    /// action.
    pub fn keymap(&self) -> Result<Keymap, ConfigError> {
        Keymap::with_overrides(&self.keypad.bindings)
            .map_err(|err| ConfigError::Validation(format!("keypad bindings: {err}")))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mediacenterd=info,mediacenter=info".to_string(),
        }
    }
}

impl Default for RelaysConfig {
    fn default() -> Self {
        Self {
            backend: RelayBackend::Sysfs,
            sysfs_root: DEFAULT_SYSFS_ROOT.to_string(),
            pins: DEFAULT_RELAY_PINS.to_vec(),
        }
    }
}

impl Default for AmplifierConfig {
    fn default() -> Self {
        Self {
            settle_ms: u64::try_from(DEFAULT_SETTLE_DELAY.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device: DEFAULT_DEVICE.to_string(),
            bindings: BTreeMap::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
