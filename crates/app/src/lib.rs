//! # mediacenter-app
//!
//! Control core — services and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `DigitalOutput` — relay pins, with hardware read-back
//!   - `AmplifierDriver` — soundbar commands and pushed state
//!   - `Clock` — timed waits (amplifier settle delay)
//!   - `Shell` — the host power-off command
//!   - `HomeAssistantPublisher` — discovery and state publishing
//! - Compose relays and the amplifier into logical devices (TV, Bluetooth
//!   streamer, turntable, printer) with their power choreography
//! - Own the command table and serialize dispatch (`Controller`)
//! - Map keypad keys onto actions (`Keymap`)
//! - Mirror device state to Home Assistant (`HomeAssistantBridge`)
//!
//! ## Dependency rule
//! Depends on `mediacenter-domain` only (plus `tokio` sync primitives and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod keymap;
pub mod observer;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
