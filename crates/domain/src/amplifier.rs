//! Amplifier value types — inputs, sound modes and volume of the soundbar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Selectable amplifier input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Tv,
    Aux1,
}

/// Speaker beam configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamMode {
    FiveBeam,
    Stereo,
}

/// Surround DSP program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DspProgram {
    Cinema,
    Off,
}

/// Amplifier volume in percent, `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Validate a volume percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VolumeOutOfRange`] outside `0..=100`.
    pub fn new(percent: i64) -> Result<Self, ValidationError> {
        u8::try_from(percent)
            .ok()
            .filter(|v| *v <= Self::MAX.0)
            .map(Self)
            .ok_or(ValidationError::VolumeOutOfRange(percent))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Build from a raw cached byte, clamping to the valid range.
    #[must_use]
    pub fn saturating(raw: u8) -> Self {
        Self(raw.min(Self::MAX.0))
    }
}

impl TryFrom<i64> for Volume {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

impl FromStr for Volume {
    type Err = ValidationError;

    /// Parses the decimal form used by the amplifier and by Home Assistant
    /// number entities (`"42"`, `"42.0"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Self::new(value);
        }
        match s.parse::<f64>() {
            #[allow(clippy::cast_possible_truncation)]
            Ok(value) if value.is_finite() && value.fract() == 0.0 => Self::new(value as i64),
            _ => Err(ValidationError::InvalidVolume(s.to_string())),
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Push notification from the amplifier's read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmplifierEvent {
    /// Volume changed, from a command or from the front panel.
    Volume(Volume),
    /// Power state reported by the device.
    Power(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_bounds() {
        assert_eq!(Volume::new(0).unwrap(), Volume::MIN);
        assert_eq!(Volume::new(100).unwrap(), Volume::MAX);
    }

    #[test]
    fn should_reject_out_of_range() {
        assert_eq!(Volume::new(101), Err(ValidationError::VolumeOutOfRange(101)));
        assert_eq!(Volume::new(-1), Err(ValidationError::VolumeOutOfRange(-1)));
    }

    #[test]
    fn should_default_to_zero() {
        assert_eq!(Volume::default().get(), 0);
    }

    #[test]
    fn should_parse_integer_and_integral_float_payloads() {
        assert_eq!("42".parse::<Volume>().unwrap().get(), 42);
        assert_eq!(" 42.0 ".parse::<Volume>().unwrap().get(), 42);
    }

    #[test]
    fn should_reject_garbage_payload() {
        assert!("loud".parse::<Volume>().is_err());
        assert!("42.5".parse::<Volume>().is_err());
    }

    #[test]
    fn should_clamp_saturating_values() {
        assert_eq!(Volume::saturating(250), Volume::MAX);
    }
}
