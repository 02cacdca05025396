//! # mediacenter-adapter-virtual
//!
//! Simulated hardware for running the controller without a Raspberry Pi.
//!
//! | Port | Implementation | Behaviour |
//! |------|----------------|-----------|
//! | `DigitalOutput` | [`VirtualDigitalOutput`] | Pins held in memory, all low at start |
//! | `AmplifierDriver` | [`VirtualAmplifier`] | Tracks soundbar state, pushes volume and power notifications |
//!
//! ## Dependency rule
//!
//! Depends on `mediacenter-app` (port traits) and `mediacenter-domain` only.

mod amplifier;
mod output;

pub use amplifier::{AmplifierSnapshot, VirtualAmplifier};
pub use output::VirtualDigitalOutput;
