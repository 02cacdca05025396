//! Relay bank — addressable on/off latches over a digital-output port.
//!
//! The hardware is the source of truth: every operation reads the pin back
//! before writing, so redundant `on`/`off` calls never touch the output.

use std::sync::Arc;

use mediacenter_domain::error::{HardwareIoError, MediaCenterError, UnknownRelayError};
use mediacenter_domain::relay::{Level, Pin, RelayAddress};

use crate::ports::DigitalOutput;

/// A fixed set of relays, addressed `1..=size`.
pub struct RelayBank<O> {
    output: O,
    pins: Vec<Pin>,
}

impl<O: DigitalOutput> RelayBank<O> {
    /// Build a bank over `pins` (relay 1 first) and switch every relay off.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareIoError`] if the initial reset cannot read or write
    /// a pin.
    pub fn new(output: O, pins: impl IntoIterator<Item = Pin>) -> Result<Self, HardwareIoError> {
        let bank = Self {
            output,
            pins: pins.into_iter().collect(),
        };
        bank.reset()?;
        Ok(bank)
    }

    /// Number of relays in the bank.
    #[must_use]
    pub fn size(&self) -> usize {
        self.pins.len()
    }

    /// Every valid address, in order.
    pub fn addresses(&self) -> impl Iterator<Item = RelayAddress> + '_ {
        (1..=self.pins.len())
            .map_while(|n| u8::try_from(n).ok())
            .filter_map(|n| RelayAddress::new(n).ok())
    }

    /// Handle for a single relay.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRelayError`] if `address` is outside the bank.
    pub fn relay(self: &Arc<Self>, address: RelayAddress) -> Result<Relay<O>, UnknownRelayError> {
        self.pin(address)?;
        Ok(Relay {
            bank: Arc::clone(self),
            address,
        })
    }

    /// Energize a relay. No write happens if it already is.
    ///
    /// # Errors
    ///
    /// Returns [`MediaCenterError::UnknownRelay`] for an address outside the
    /// bank, or [`MediaCenterError::Hardware`] when the pin cannot be read or
    /// written.
    pub fn on(&self, address: RelayAddress) -> Result<(), MediaCenterError> {
        self.drive(address, Level::High)
    }

    /// De-energize a relay. No write happens if it already is.
    ///
    /// # Errors
    ///
    /// Same as [`on`](Self::on).
    pub fn off(&self, address: RelayAddress) -> Result<(), MediaCenterError> {
        self.drive(address, Level::Low)
    }

    /// Whether the relay is energized, read back from the hardware.
    ///
    /// # Errors
    ///
    /// Same as [`on`](Self::on).
    pub fn enabled(&self, address: RelayAddress) -> Result<bool, MediaCenterError> {
        let pin = self.pin(address)?;
        Ok(self.output.read(pin)?.is_high())
    }

    /// Switch every relay off.
    ///
    /// # Errors
    ///
    /// Returns the first [`HardwareIoError`]; relays after the failing one
    /// are left untouched.
    pub fn reset(&self) -> Result<(), HardwareIoError> {
        for (index, pin) in self.pins.iter().enumerate() {
            if self.write_if_changed(*pin, Level::Low)? {
                tracing::debug!(relay = index + 1, pin = %pin, "relay reset");
            }
        }
        Ok(())
    }

    fn drive(&self, address: RelayAddress, level: Level) -> Result<(), MediaCenterError> {
        let pin = self.pin(address)?;
        if self.write_if_changed(pin, level)? {
            tracing::debug!(
                relay = %address,
                pin = %pin,
                on = level.is_high(),
                "relay switched"
            );
        }
        Ok(())
    }

    /// Returns whether a write happened.
    fn write_if_changed(&self, pin: Pin, level: Level) -> Result<bool, HardwareIoError> {
        if self.output.read(pin)? == level {
            return Ok(false);
        }
        self.output.write(pin, level)?;
        Ok(true)
    }

    fn pin(&self, address: RelayAddress) -> Result<Pin, UnknownRelayError> {
        self.pins
            .get(address.index())
            .copied()
            .ok_or(UnknownRelayError {
                address: address.get(),
                size: self.pins.len(),
            })
    }
}

/// View of a single relay; cheap to clone.
pub struct Relay<O> {
    bank: Arc<RelayBank<O>>,
    address: RelayAddress,
}

impl<O> Clone for Relay<O> {
    fn clone(&self) -> Self {
        Self {
            bank: Arc::clone(&self.bank),
            address: self.address,
        }
    }
}

impl<O: DigitalOutput> Relay<O> {
    #[must_use]
    pub fn address(&self) -> RelayAddress {
        self.address
    }

    /// # Errors
    ///
    /// See [`RelayBank::on`].
    pub fn on(&self) -> Result<(), MediaCenterError> {
        self.bank.on(self.address)
    }

    /// # Errors
    ///
    /// See [`RelayBank::off`].
    pub fn off(&self) -> Result<(), MediaCenterError> {
        self.bank.off(self.address)
    }

    /// # Errors
    ///
    /// See [`RelayBank::enabled`].
    pub fn enabled(&self) -> Result<bool, MediaCenterError> {
        self.bank.enabled(self.address)
    }
}
