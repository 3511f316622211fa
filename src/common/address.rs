// src/common/address.rs

use super::error::Sht3xError;
use core::convert::TryFrom;
use core::fmt;

/// Bus address of an SHT3x device, selected by the ADDR pin at power-up.
///
/// The address is fixed per device instance; a session is bound to one
/// address at construction and never changes it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum SensorAddress {
    /// ADDR pin tied to ground: 0x44.
    AdrLow,
    /// ADDR pin tied to VDD: 0x45. Factory default on most breakout boards.
    AdrHigh,
}

impl SensorAddress {
    pub const DEFAULT_ADDRESS: SensorAddress = SensorAddress::AdrHigh;

    /// The raw 7-bit bus address.
    #[inline]
    pub const fn raw(self) -> u8 {
        match self {
            SensorAddress::AdrLow => 0x44,
            SensorAddress::AdrHigh => 0x45,
        }
    }
}

impl Default for SensorAddress {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for SensorAddress {
    // Validation itself cannot cause a bus error, so E = ()
    type Error = Sht3xError<()>;

    /// Attempts to convert a raw 7-bit address into a `SensorAddress`.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x44 => Ok(SensorAddress::AdrLow),
            0x45 => Ok(SensorAddress::AdrHigh),
            other => Err(Sht3xError::InvalidAddress(other)),
        }
    }
}

impl From<SensorAddress> for u8 {
    fn from(value: SensorAddress) -> Self {
        value.raw()
    }
}

impl fmt::Display for SensorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.raw())
    }
}
