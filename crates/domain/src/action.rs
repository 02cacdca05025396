//! Action — the symbolic commands of the controller's command table.
//!
//! The names are a stable contract shared by the keypad and the Home
//! Assistant bridge; keycodes and MQTT topics map onto them, never onto
//! devices directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::DeviceName;
use crate::error::ValidationError;

/// A command the controller can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    TvOn,
    TvOff,
    TurntableOn,
    TurntableOff,
    StreamingOn,
    StreamingOff,
    PrinterOn,
    PrinterOff,
    /// Amplifier off, every relay off.
    Off,
    /// [`Action::Off`] followed by host power-off.
    Shutdown,
    VolumeUp,
    VolumeDown,
    /// Needs a volume argument at dispatch time.
    VolumeSet,
}

impl Action {
    pub const ALL: [Self; 13] = [
        Self::TvOn,
        Self::TvOff,
        Self::TurntableOn,
        Self::TurntableOff,
        Self::StreamingOn,
        Self::StreamingOff,
        Self::PrinterOn,
        Self::PrinterOff,
        Self::Off,
        Self::Shutdown,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::VolumeSet,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TvOn => "tv_on",
            Self::TvOff => "tv_off",
            Self::TurntableOn => "turntable_on",
            Self::TurntableOff => "turntable_off",
            Self::StreamingOn => "streaming_on",
            Self::StreamingOff => "streaming_off",
            Self::PrinterOn => "printer_on",
            Self::PrinterOff => "printer_off",
            Self::Off => "off",
            Self::Shutdown => "shutdown",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::VolumeSet => "volume_set",
        }
    }

    /// The device and target power state for `*_on` / `*_off` actions.
    #[must_use]
    pub fn power_target(self) -> Option<(DeviceName, bool)> {
        match self {
            Self::TvOn => Some((DeviceName::Tv, true)),
            Self::TvOff => Some((DeviceName::Tv, false)),
            Self::TurntableOn => Some((DeviceName::Turntable, true)),
            Self::TurntableOff => Some((DeviceName::Turntable, false)),
            Self::StreamingOn => Some((DeviceName::Bt, true)),
            Self::StreamingOff => Some((DeviceName::Bt, false)),
            Self::PrinterOn => Some((DeviceName::Printer, true)),
            Self::PrinterOff => Some((DeviceName::Printer, false)),
            _ => None,
        }
    }

    /// The `*_on` or `*_off` action for a device.
    #[must_use]
    pub fn power(device: DeviceName, on: bool) -> Self {
        match (device, on) {
            (DeviceName::Tv, true) => Self::TvOn,
            (DeviceName::Tv, false) => Self::TvOff,
            (DeviceName::Bt, true) => Self::StreamingOn,
            (DeviceName::Bt, false) => Self::StreamingOff,
            (DeviceName::Turntable, true) => Self::TurntableOn,
            (DeviceName::Turntable, false) => Self::TurntableOff,
            (DeviceName::Printer, true) => Self::PrinterOn,
            (DeviceName::Printer, false) => Self::PrinterOff,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| ValidationError::UnknownAction(s.to_string()))
    }
}
