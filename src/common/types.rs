// src/common/types.rs

use super::timing;
use core::time::Duration;

// --- Repeatability ---

/// Measurement repeatability setting.
///
/// Higher repeatability lowers measurement noise at the cost of a longer
/// conversion time and higher power draw. Frozen for the duration of a mode
/// and re-specified on every start command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Repeatability {
    /// 0.06 degC / 0.10 %RH repeatability, longest conversion.
    High,
    /// 0.12 degC / 0.15 %RH repeatability.
    Medium,
    /// 0.24 degC / 0.25 %RH repeatability, shortest conversion.
    Low,
}

impl Repeatability {
    /// Maximum conversion time from the datasheet.
    pub const fn conversion_time(self) -> Duration {
        match self {
            Repeatability::High => timing::CONVERSION_TIME_HIGH,
            Repeatability::Medium => timing::CONVERSION_TIME_MEDIUM,
            Repeatability::Low => timing::CONVERSION_TIME_LOW,
        }
    }

    /// Upper bound the session waits for a conversion before reporting
    /// `Timeout` (datasheet maximum with a safety factor).
    pub const fn conversion_timeout(self) -> Duration {
        timing::conversion_timeout(self.conversion_time())
    }
}

// --- Sample rate ---

/// Sampling frequency in periodic mode.
///
/// The device supports exactly these five rates; anything else is
/// unrepresentable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SampleRate {
    /// 0.5 measurements per second.
    HalfHz,
    /// 1 measurement per second.
    Hz1,
    /// 2 measurements per second.
    Hz2,
    /// 4 measurements per second.
    Hz4,
    /// 10 measurements per second.
    Hz10,
}

impl SampleRate {
    /// Interval between two consecutive samples.
    pub const fn period(self) -> Duration {
        match self {
            SampleRate::HalfHz => Duration::from_millis(2000),
            SampleRate::Hz1 => Duration::from_millis(1000),
            SampleRate::Hz2 => Duration::from_millis(500),
            SampleRate::Hz4 => Duration::from_millis(250),
            SampleRate::Hz10 => Duration::from_millis(100),
        }
    }

    /// Frequency in hertz.
    pub const fn hertz(self) -> f32 {
        match self {
            SampleRate::HalfHz => 0.5,
            SampleRate::Hz1 => 1.0,
            SampleRate::Hz2 => 2.0,
            SampleRate::Hz4 => 4.0,
            SampleRate::Hz10 => 10.0,
        }
    }
}

// --- Acquisition mode ---

/// Acquisition mode tracked by the session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Mode {
    /// No acquisition in progress; start commands are legal.
    #[default]
    Idle,
    /// A single-shot conversion is in flight. Transient: never observable
    /// across a public call boundary.
    SingleShotPending,
    /// The device samples autonomously at a fixed rate.
    Periodic,
}

// --- Measurement ---

/// One temperature/humidity snapshot.
///
/// All three values derive from the same raw frame; they are never
/// individually stale. Ephemeral: produced per fetch, not cached.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    /// Ambient temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Ambient temperature in degrees Fahrenheit.
    pub temperature_f: f32,
    /// Relative humidity in %RH.
    pub humidity_percent: f32,
}

impl Measurement {
    /// Converts one raw frame into engineering units.
    ///
    /// degC = 175 * raw / 65535 - 45, degF = 1.8 * degC + 32,
    /// %RH = 100 * raw / 65535.
    pub fn from_raw(raw_temperature: u16, raw_humidity: u16) -> Self {
        let temperature_c = 175.0 * raw_temperature as f32 / 65535.0 - 45.0;
        Measurement {
            temperature_c,
            temperature_f: 1.8 * temperature_c + 32.0,
            humidity_percent: 100.0 * raw_humidity as f32 / 65535.0,
        }
    }
}

// --- Status register ---

/// Decoded device status register.
///
/// Bit layout per the datasheet; reserved bits are kept in `raw` but not
/// exposed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StatusRegister {
    raw: u16,
}

impl StatusRegister {
    pub const fn from_word(raw: u16) -> Self {
        StatusRegister { raw }
    }

    /// The raw register word.
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Checksum of the last write transfer failed.
    pub const fn write_checksum_failed(self) -> bool {
        self.raw & (1 << 0) != 0
    }

    /// Last command was not processed by the device.
    pub const fn command_failed(self) -> bool {
        self.raw & (1 << 1) != 0
    }

    /// A reset (hard, soft or supply fail) occurred since the last clear.
    pub const fn reset_detected(self) -> bool {
        self.raw & (1 << 4) != 0
    }

    /// Temperature tracking crossed an alert threshold.
    pub const fn temperature_alert(self) -> bool {
        self.raw & (1 << 10) != 0
    }

    /// Humidity tracking crossed an alert threshold.
    pub const fn humidity_alert(self) -> bool {
        self.raw & (1 << 11) != 0
    }

    /// The internal heater is on.
    pub const fn heater_on(self) -> bool {
        self.raw & (1 << 13) != 0
    }

    /// At least one alert is pending.
    pub const fn alert_pending(self) -> bool {
        self.raw & (1 << 15) != 0
    }
}
