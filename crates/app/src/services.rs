//! Application services — the control core.
//!
//! Each service accepts port implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete
//! adapters. Leaves first: relay bank and amplifier facade, then the logical
//! devices built on them, then the controller composing everything.

pub mod amplifier;
pub mod board_control;
pub mod controller;
pub mod devices;
pub mod home_assistant;
pub mod relay_bank;
pub mod volume_control;
