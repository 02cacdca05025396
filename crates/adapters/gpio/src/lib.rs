//! # mediacenter-adapter-gpio
//!
//! [`DigitalOutput`](mediacenter_app::ports::DigitalOutput) over the Linux
//! sysfs GPIO interface (`/sys/class/gpio`), BCM pin numbering.
//!
//! Pins are exported and configured as outputs when the adapter is opened;
//! a pin that cannot be set up makes [`SysfsGpio::open`] fail, so a broken
//! relay HAT is reported at startup rather than on the first key press.
//!
//! ## Dependency rule
//!
//! Depends on `mediacenter-app` (port traits) and `mediacenter-domain` only.

mod error;
mod sysfs;

pub use error::GpioError;
pub use sysfs::{DEFAULT_SYSFS_ROOT, SysfsGpio};
