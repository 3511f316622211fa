// src/common/hal_adapter.rs

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as I2cError, ErrorKind, I2c, NoAcknowledgeSource};

use super::address::SensorAddress;
use super::hal_traits::{ResetLine, Sht3xBus, Sht3xInstant, Sht3xTimer};

/// Monotonic clock half of the session interface.
///
/// `embedded-hal` v1 has no clock trait, so the platform supplies this part
/// itself (a tick counter, a RTC, `std::time::Instant` on hosted targets).
pub trait TimeSource {
    type Instant: Sht3xInstant;

    fn now(&self) -> Self::Instant;
}

/// Bundles an `embedded-hal` I2C peripheral, a delay provider and a clock
/// into a complete session interface.
pub struct HalInterface<I2C, D, C> {
    i2c: I2C,
    delay: D,
    clock: C,
}

impl<I2C, D, C> HalInterface<I2C, D, C> {
    pub fn new(i2c: I2C, delay: D, clock: C) -> Self {
        HalInterface { i2c, delay, clock }
    }

    /// Releases the wrapped peripherals.
    pub fn release(self) -> (I2C, D, C) {
        (self.i2c, self.delay, self.clock)
    }
}

/// An address NACK is the device saying "not ready yet"; everything else is
/// a real bus fault.
fn classify<E: I2cError>(e: E) -> nb::Error<E> {
    match e.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => nb::Error::WouldBlock,
        _ => nb::Error::Other(e),
    }
}

impl<I2C, D, C> Sht3xBus for HalInterface<I2C, D, C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_frame(
        &mut self,
        address: SensorAddress,
        bytes: &[u8],
    ) -> nb::Result<(), Self::Error> {
        self.i2c.write(address.raw(), bytes).map_err(classify)
    }

    fn read_frame(
        &mut self,
        address: SensorAddress,
        buffer: &mut [u8],
    ) -> nb::Result<(), Self::Error> {
        self.i2c.read(address.raw(), buffer).map_err(classify)
    }
}

impl<I2C, D, C> Sht3xTimer for HalInterface<I2C, D, C>
where
    D: DelayNs,
    C: TimeSource,
{
    type Instant = C::Instant;

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn now(&self) -> Self::Instant {
        self.clock.now()
    }
}

// Any infallible push-pull pin can drive nRESET directly.
impl<P> ResetLine for P
where
    P: OutputPin<Error = Infallible>,
{
    fn assert_reset(&mut self) {
        match self.set_low() {
            Ok(()) => (),
            Err(e) => match e {},
        }
    }

    fn release_reset(&mut self) {
        match self.set_high() {
            Ok(()) => (),
            Err(e) => match e {},
        }
    }
}
