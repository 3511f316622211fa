// src/common/timing.rs

use core::time::Duration;

// Note: Values are the datasheet maxima ("System Timing Specifications" and
// "Measurement Duration", Sensirion SHT3x-DIS); typical values are lower.
// The session budgets against the maxima so a slow part never trips a
// spurious timeout.

// === Measurement Duration (Table 4) ===

/// Maximum conversion time, low repeatability.
pub const CONVERSION_TIME_LOW: Duration = Duration::from_millis(4);
/// Maximum conversion time, medium repeatability.
pub const CONVERSION_TIME_MEDIUM: Duration = Duration::from_millis(6);
/// Maximum conversion time, high repeatability.
pub const CONVERSION_TIME_HIGH: Duration = Duration::from_millis(15);

/// Bound past which the session gives up on a conversion: the datasheet
/// maximum with a 3/2 safety factor.
pub const fn conversion_timeout(nominal: Duration) -> Duration {
    Duration::from_micros(nominal.as_micros() as u64 * 3 / 2)
}

// === Reset Timing (Table 5) ===

/// Time for the device to enter idle after a soft reset command.
pub const SOFT_RESET_SETTLE: Duration = Duration::from_micros(1500);
/// Low pulse width on nRESET for a hardware reset. The datasheet minimum is
/// 350 ns; 1 ms keeps slow GPIO drivers safe.
pub const RESET_PULSE: Duration = Duration::from_millis(1);
/// Time from releasing nRESET until the device accepts commands.
pub const POST_RESET_WAKEUP: Duration = Duration::from_millis(2);

// === Command/Response Timing ===

/// Time between writing a command and its response words being readable.
pub const COMMAND_LATENCY: Duration = Duration::from_millis(1);
/// Settle time after a clear-status command.
pub const STATUS_CLEAR_SETTLE: Duration = Duration::from_millis(10);

/// Window within which a command write must be acknowledged.
pub const WRITE_ACK_TIMEOUT: Duration = Duration::from_millis(5);
/// Window within which a non-measurement read must complete.
pub const READ_TIMEOUT: Duration = Duration::from_millis(5);

/// Interval between attempts while the device holds an exchange off with
/// NACKs.
pub const POLL_INTERVAL: Duration = Duration::from_micros(500);
