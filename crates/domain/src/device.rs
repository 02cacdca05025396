//! Logical device names — the keys of the controller's device registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownDeviceError;

/// A logical device composed from relays and, for audio sources, the
/// shared amplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceName {
    Tv,
    /// Bluetooth streaming receiver, wired to the soundbar's TV input.
    Bt,
    Turntable,
    Printer,
}

impl DeviceName {
    /// Every configured device, in registry order.
    pub const ALL: [Self; 4] = [Self::Tv, Self::Bt, Self::Turntable, Self::Printer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Bt => "bt",
            Self::Turntable => "turntable",
            Self::Printer => "printer",
        }
    }

    /// Whether the device plays through the amplifier.
    #[must_use]
    pub fn has_audio(self) -> bool {
        !matches!(self, Self::Printer)
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceName {
    type Err = UnknownDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownDeviceError {
                name: s.to_string(),
            })
    }
}
