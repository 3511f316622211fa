// src/common/hal_traits.rs

use super::address::SensorAddress;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Monotonic instant produced by [`Sht3xTimer::now`].
///
/// Close enough to `std::time::Instant` for deadline arithmetic; embedded
/// platforms implement it over a tick counter.
pub trait Sht3xInstant:
    Copy + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Sht3xInstant for T where
    T: Copy + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

/// Abstraction for timer/delay operations required by the session.
///
/// Note: This could potentially be replaced by directly requiring
/// `embedded_hal::delay::DelayNs` if embedded-hal v1 were mandated, but
/// embedded-hal has no clock trait and the session needs `now` for its
/// deadlines and sample pacing.
pub trait Sht3xTimer {
    /// Monotonic instant type.
    type Instant: Sht3xInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current instant on a monotonic clock.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for the two-wire bus exchanges the session performs.
///
/// One `write_frame`/`read_frame` call is one complete bus transaction at
/// the given address. Returning `Err(nb::Error::WouldBlock)` means the
/// device did not acknowledge the transfer; on the SHT3x that is the
/// normal "conversion still in progress" signal, not a fault. Hard bus
/// failures are returned as `Err(nb::Error::Other(Self::Error))` and are
/// always propagated to the caller.
pub trait Sht3xBus {
    /// Associated error type for bus faults.
    type Error: Debug;

    /// Writes a complete frame to the device.
    fn write_frame(&mut self, address: SensorAddress, bytes: &[u8])
        -> nb::Result<(), Self::Error>;

    /// Fills `buffer` with a complete response frame from the device.
    fn read_frame(&mut self, address: SensorAddress, buffer: &mut [u8])
        -> nb::Result<(), Self::Error>;
}

/// Optional hardware reset line (nRESET, active low).
///
/// Driving a GPIO is assumed infallible; adapt fallible drivers before the
/// session boundary. If the line is not wired, only the soft reset command
/// is available.
pub trait ResetLine {
    /// Drives nRESET low.
    fn assert_reset(&mut self);

    /// Releases nRESET high.
    fn release_reset(&mut self);
}
