// src/session/mod.rs

// Declare the modules within the session directory.
mod acquisition;
mod limits;
mod transaction;

#[cfg(test)]
mod mock;

// Re-export the public session surface.
pub use acquisition::AcquisitionController;
pub use limits::AlertLimits;

use core::fmt::Debug;
use core::time::Duration;

use crate::common::address::SensorAddress;
use crate::common::command::Command;
use crate::common::error::{InitError, Sht3xError};
use crate::common::hal_traits::{ResetLine, Sht3xBus, Sht3xTimer};
use crate::common::timing;
use crate::common::types::{Measurement, Mode, Repeatability, SampleRate, StatusRegister};

/// Bounded retry policy for initialization.
///
/// The session performs up to `max_attempts` probes, sleeping `backoff`
/// between failed ones; `max_total` additionally caps the wall-clock time
/// spent. Whichever bound is hit first ends the attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Probes to perform before giving up. Treated as at least one.
    pub max_attempts: u32,
    /// Pause between failed probes.
    pub backoff: Duration,
    /// Optional wall-clock cap across all probes.
    pub max_total: Option<Duration>,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        RetryPolicy { max_attempts, backoff, max_total: None }
    }

    pub const fn with_max_total(mut self, max_total: Duration) -> Self {
        self.max_total = Some(max_total);
        self
    }
}

/// An exclusive session with one SHT3x device.
///
/// The session owns the bus interface for its whole lifetime; every
/// operation takes `&mut self` and completes its full command/response
/// exchange before returning, so no other operation can observe a
/// half-finished transaction. For the same reason the session is not meant
/// to be shared across threads without external serialization.
pub struct Sht3xSession<IF>
where
    IF: Sht3xBus + Sht3xTimer,
{
    interface: IF,
    address: SensorAddress,
    serial_number: Option<u32>,
    controller: AcquisitionController,
    last_fetch: Option<IF::Instant>,
}

impl<IF> Sht3xSession<IF>
where
    IF: Sht3xBus + Sht3xTimer,
    IF::Error: Debug,
{
    /// Creates a session bound to `address`. No bus traffic happens until
    /// the first operation.
    pub fn new(interface: IF, address: SensorAddress) -> Self {
        Sht3xSession {
            interface,
            address,
            serial_number: None,
            controller: AcquisitionController::new(),
            last_fetch: None,
        }
    }

    /// Releases the bus interface.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Accessors ---

    /// Bus address this session is bound to.
    pub fn address(&self) -> SensorAddress {
        self.address
    }

    /// Serial number cached by the last successful identify, if any.
    pub fn serial_number(&self) -> Option<u32> {
        self.serial_number
    }

    /// Current acquisition mode.
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    /// Sampling rate while periodic mode is active.
    pub fn sample_rate(&self) -> Option<SampleRate> {
        self.controller.sample_rate()
    }

    /// Repeatability frozen by the active mode.
    pub fn repeatability(&self) -> Option<Repeatability> {
        self.controller.repeatability()
    }

    // --- Initialization ---

    /// Probes the device until it answers, within the bounds of `policy`.
    ///
    /// One probe is a soft reset followed by a serial-number read; the
    /// device counts as reachable once both succeed. Exhausting the policy
    /// fails with `InitError::TransportUnavailable` carrying the last
    /// probe's failure.
    pub fn initialize(&mut self, policy: RetryPolicy) -> Result<(), InitError<IF::Error>> {
        let started = self.interface.now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let last_error = match self.probe() {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            let out_of_attempts = attempts >= policy.max_attempts;
            let out_of_time = policy
                .max_total
                .is_some_and(|cap| self.interface.now() - started >= cap);
            if out_of_attempts || out_of_time {
                return Err(InitError::TransportUnavailable { attempts, last_error });
            }
            self.delay(policy.backoff);
        }
    }

    /// Hardware-resets the device through `line`, then probes as
    /// [`initialize`](Self::initialize) does. Use when nRESET is wired.
    pub fn initialize_with_reset_line<R: ResetLine>(
        &mut self,
        line: &mut R,
        policy: RetryPolicy,
    ) -> Result<(), InitError<IF::Error>> {
        self.pulse_reset_line(line);
        self.initialize(policy)
    }

    /// Drives nRESET low-then-high and waits for the device to wake.
    pub fn pulse_reset_line<R: ResetLine>(&mut self, line: &mut R) {
        line.assert_reset();
        self.delay(timing::RESET_PULSE);
        line.release_reset();
        self.delay(timing::POST_RESET_WAKEUP);
    }

    fn probe(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.soft_reset()?;
        self.read_serial_number()?;
        Ok(())
    }

    // --- Device commands ---

    /// Reads the 32-bit chip serial number and caches it on the session.
    ///
    /// Both response words are CRC-checked; a corrupted response fails with
    /// `ChecksumMismatch` and leaves the cache untouched. A serial number
    /// is never fabricated from bad data.
    pub fn read_serial_number(&mut self) -> Result<u32, Sht3xError<IF::Error>> {
        self.write_command(Command::ReadSerialNumber)?;
        self.delay(timing::COMMAND_LATENCY);
        let [high, low] = self.read_words::<2>(timing::READ_TIMEOUT)?;
        let serial = (u32::from(high) << 16) | u32::from(low);
        self.serial_number = Some(serial);
        Ok(serial)
    }

    /// Soft-resets the device: back to the idle single-shot state, alerts
    /// cleared, heater off. Callable from any mode, including periodic
    /// acquisition.
    ///
    /// The mode tracking commits to `Idle` only once the status register
    /// confirms the command executed. A failed reset reports the failure
    /// and leaves the tracking on its last confirmed state, because the
    /// device's true mode is then unknown.
    pub fn soft_reset(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.write_command(Command::SoftReset)?;
        self.delay(timing::SOFT_RESET_SETTLE);
        self.verify_command_accepted()?;
        self.controller.reset();
        self.last_fetch = None;
        Ok(())
    }

    /// Reads and decodes the status register.
    ///
    /// Single attempt per call; retrying a bad checksum is the caller's
    /// decision.
    pub fn read_status(&mut self) -> Result<StatusRegister, Sht3xError<IF::Error>> {
        self.read_status_word()
    }

    /// Clears the sticky status flags (alert pending, reset detected).
    pub fn clear_status(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.write_command(Command::ClearStatus)?;
        self.delay(timing::STATUS_CLEAR_SETTLE);
        Ok(())
    }

    /// Switches the internal heater on and confirms via the status
    /// register. The heater exists for plausibility checks in condensing
    /// environments; readings taken while it runs are not ambient.
    pub fn heater_enable(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.set_heater(Command::HeaterEnable, true)
    }

    /// Switches the internal heater off.
    pub fn heater_disable(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.set_heater(Command::HeaterDisable, false)
    }

    fn set_heater(
        &mut self,
        command: Command,
        expect_on: bool,
    ) -> Result<(), Sht3xError<IF::Error>> {
        self.write_command(command)?;
        self.delay(timing::COMMAND_LATENCY);
        let status = self.read_status_word()?;
        if status.heater_on() != expect_on {
            return Err(Sht3xError::CommandFailed);
        }
        Ok(())
    }

    // --- Acquisition ---

    /// Enters periodic mode at `rate`. Legal only from `Idle`; anything
    /// else fails with `InvalidState` and changes nothing.
    ///
    /// `rate` and `repeatability` stay frozen until the mode is left and
    /// are re-specified on every call.
    pub fn start_periodic_mode(
        &mut self,
        rate: SampleRate,
        repeatability: Repeatability,
    ) -> Result<(), Sht3xError<IF::Error>> {
        self.controller.require(Mode::Idle)?;
        self.write_command(Command::StartPeriodic(rate, repeatability))?;
        self.delay(timing::COMMAND_LATENCY);
        self.verify_command_accepted()?;
        self.controller.enter_periodic(rate, repeatability);
        // Pacing counts from mode entry: the first sample is ready one
        // period after the start command.
        self.last_fetch = Some(self.interface.now());
        Ok(())
    }

    /// Leaves periodic mode. Legal only from `Periodic`.
    pub fn stop_periodic_mode(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        self.controller.require_periodic()?;
        self.write_command(Command::StopPeriodic)?;
        self.delay(timing::COMMAND_LATENCY);
        self.verify_command_accepted()?;
        self.controller.leave_periodic();
        self.last_fetch = None;
        Ok(())
    }

    /// Triggers one conversion and blocks until its result is ready.
    ///
    /// Legal only from `Idle`. The session passes through a transient
    /// single-shot state and is back in `Idle` when this returns, success
    /// or failure.
    ///
    /// The call waits the nominal conversion time for `repeatability`,
    /// then polls until the datasheet maximum with a 1.5x safety factor;
    /// past that bound the measurement fails with `Timeout`.
    pub fn measure_once(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<Measurement, Sht3xError<IF::Error>> {
        self.controller.require(Mode::Idle)?;
        self.controller.begin_single_shot(repeatability);
        let result = self.run_single_shot(repeatability);
        self.controller.finish_single_shot();
        result
    }

    fn run_single_shot(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<Measurement, Sht3xError<IF::Error>> {
        self.write_command(Command::SingleShot(repeatability))?;
        self.delay(repeatability.conversion_time());
        let poll_window = repeatability.conversion_timeout() - repeatability.conversion_time();
        self.read_measurement(poll_window)
    }

    /// Reads the latest sample buffered by periodic mode. Legal only from
    /// `Periodic`.
    ///
    /// Pacing is fail-fast: calling faster than the configured rate fails
    /// with `NoFreshData` instead of blocking until the next sample is due.
    pub fn fetch_periodic_sample(&mut self) -> Result<Measurement, Sht3xError<IF::Error>> {
        let rate = self.controller.require_periodic()?;

        let now = self.interface.now();
        if let Some(previous) = self.last_fetch {
            if now - previous < rate.period() {
                return Err(Sht3xError::NoFreshData);
            }
        }

        self.write_command(Command::FetchPeriodic)?;
        let measurement = self.read_measurement(timing::READ_TIMEOUT)?;
        self.last_fetch = Some(self.interface.now());
        Ok(measurement)
    }
}
