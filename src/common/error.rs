// src/common/error.rs

use super::types::Mode;

/// Protocol-level failure detected by the device session.
///
/// Each variant is a distinct, recoverable condition the caller can branch
/// on; the session never masks one of these as success.
#[derive(Debug, thiserror::Error)]
pub enum Sht3xError<E = ()>
where
    E: core::fmt::Debug, // Need Debug for the generic bus error
{
    /// Underlying bus error from the transport implementation.
    #[error("bus error: {0:?}")] // Format string requires Debug on E
    Bus(E),

    /// No response arrived within the bounded window.
    #[error("operation timed out")]
    Timeout,

    /// Received CRC does not match the calculated CRC.
    #[error("checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// The requested operation is not legal in the current acquisition mode.
    #[error("invalid state: operation not permitted while {current:?}")]
    InvalidState { current: Mode },

    /// No new periodic sample is ready yet at the configured rate.
    #[error("no fresh sample available yet")]
    NoFreshData,

    /// The device status register reports the last command was not processed.
    #[error("command rejected by device")]
    CommandFailed,

    /// Not a valid SHT3x bus address.
    #[error("invalid sensor address: {0:#04x}")]
    InvalidAddress(u8),

    /// Alert thresholds are not strictly ordered.
    #[error("alert limits not strictly ordered")]
    InvalidLimits,
}

// Allow mapping from the underlying bus error
impl<E: core::fmt::Debug> From<E> for Sht3xError<E> {
    fn from(e: E) -> Self {
        Sht3xError::Bus(e)
    }
}

/// Terminal initialization failure.
///
/// Produced when the bounded retry policy is exhausted without the device
/// ever acknowledging; the caller decides whether to retry with a wider
/// policy or abort.
#[derive(Debug, thiserror::Error)]
pub enum InitError<E>
where
    E: core::fmt::Debug,
{
    /// The device did not acknowledge within the retry policy.
    #[error("transport unavailable: no acknowledge after {attempts} attempts ({last_error})")]
    TransportUnavailable {
        /// Probes performed before giving up.
        attempts: u32,
        /// Failure observed on the final probe.
        last_error: Sht3xError<E>,
    },
}
