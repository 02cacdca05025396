//! Relay addressing — stable 1-based relay numbers and the hardware pins
//! they drive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// BCM pin numbers of the four-relay HAT, relay 1 first.
pub const DEFAULT_RELAY_PINS: [u8; 4] = [6, 13, 19, 26];

/// A hardware output pin (BCM numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(u8);

impl Pin {
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Logic level of a digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// `true` for [`Level::High`].
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Stable 1-based relay number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RelayAddress(u8);

impl RelayAddress {
    /// Relay feeding the soundbar.
    pub const YSP: Self = Self(1);
    /// Relay feeding the turntable.
    pub const TURNTABLE: Self = Self(3);
    /// Relay feeding the printer.
    pub const PRINTER: Self = Self(4);

    /// Validate a relay number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RelayAddressOutOfRange`] for `0`.
    pub fn new(address: u8) -> Result<Self, ValidationError> {
        if address == 0 {
            return Err(ValidationError::RelayAddressOutOfRange(address));
        }
        Ok(Self(address))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into a bank's pin table.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for RelayAddress {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RelayAddress> for u8 {
    fn from(address: RelayAddress) -> Self {
        address.0
    }
}

impl fmt::Display for RelayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
