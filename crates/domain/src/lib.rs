//! # mediacenter-domain
//!
//! Pure domain model for the media center controller.
//!
//! ## Responsibilities
//! - Relay addressing and pin levels
//! - Logical device names (the registry keys)
//! - **Actions** — the symbolic command table names (`tv_on`, `off`, `volume_set`, …)
//! - Amplifier value types (input, beam mode, DSP program, volume)
//! - Error conventions shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod action;
pub mod amplifier;
pub mod device;
pub mod error;
pub mod relay;
