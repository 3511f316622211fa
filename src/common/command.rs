//! SHT3x command words.
//!
//! Every exchange starts with a 16-bit command word sent MSB first. Write
//! transactions that carry data (alert limit writes) append the data word
//! and its CRC to the same frame.

use arrayvec::ArrayVec;

use super::crc::append_crc8;
use super::types::{Repeatability, SampleRate};

/// Longest write frame on the bus: command word, data word, CRC.
pub const MAX_FRAME_LEN: usize = 5;

/// Alert limit slot addressed by the limit read/write commands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AlertLimit {
    /// Upper threshold; crossing it raises the alert.
    HighSet,
    /// Upper release; dropping below it clears the alert.
    HighClear,
    /// Lower release; rising above it clears the alert.
    LowClear,
    /// Lower threshold; crossing it raises the alert.
    LowSet,
}

/// A command understood by the SHT3x.
///
/// The enum is closed over the command set the device implements, so an
/// invalid mode/rate combination is unrepresentable rather than rejected at
/// the bus level.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    /// Read the 32-bit chip serial number.
    ReadSerialNumber,
    /// Trigger one conversion without clock stretching; the result is polled.
    SingleShot(Repeatability),
    /// Enter periodic mode at the given rate and repeatability.
    StartPeriodic(SampleRate, Repeatability),
    /// Read out the latest sample buffered by periodic mode.
    FetchPeriodic,
    /// Leave periodic mode (break command).
    StopPeriodic,
    /// Return to the idle single-shot state, clear alerts, disable the heater.
    SoftReset,
    /// Switch the internal heater on.
    HeaterEnable,
    /// Switch the internal heater off.
    HeaterDisable,
    /// Read the status register.
    ReadStatus,
    /// Clear the sticky status flags.
    ClearStatus,
    /// Read one alert limit word.
    ReadAlertLimit(AlertLimit),
    /// Write one alert limit word (carries a data word).
    WriteAlertLimit(AlertLimit),
}

impl Command {
    /// The 16-bit command word.
    pub const fn code(self) -> u16 {
        use Repeatability::{High, Low, Medium};
        use SampleRate::{HalfHz, Hz1, Hz10, Hz2, Hz4};
        match self {
            Command::ReadSerialNumber => 0x3780,

            Command::SingleShot(High) => 0x2400,
            Command::SingleShot(Medium) => 0x240B,
            Command::SingleShot(Low) => 0x2416,

            Command::StartPeriodic(HalfHz, High) => 0x2032,
            Command::StartPeriodic(HalfHz, Medium) => 0x2024,
            Command::StartPeriodic(HalfHz, Low) => 0x202F,
            Command::StartPeriodic(Hz1, High) => 0x2130,
            Command::StartPeriodic(Hz1, Medium) => 0x2126,
            Command::StartPeriodic(Hz1, Low) => 0x212D,
            Command::StartPeriodic(Hz2, High) => 0x2236,
            Command::StartPeriodic(Hz2, Medium) => 0x2220,
            Command::StartPeriodic(Hz2, Low) => 0x222B,
            Command::StartPeriodic(Hz4, High) => 0x2334,
            Command::StartPeriodic(Hz4, Medium) => 0x2322,
            Command::StartPeriodic(Hz4, Low) => 0x2329,
            Command::StartPeriodic(Hz10, High) => 0x2737,
            Command::StartPeriodic(Hz10, Medium) => 0x2721,
            Command::StartPeriodic(Hz10, Low) => 0x272A,

            Command::FetchPeriodic => 0xE000,
            Command::StopPeriodic => 0x3093,
            Command::SoftReset => 0x30A2,
            Command::HeaterEnable => 0x306D,
            Command::HeaterDisable => 0x3066,
            Command::ReadStatus => 0xF32D,
            Command::ClearStatus => 0x3041,

            Command::ReadAlertLimit(AlertLimit::HighSet) => 0xE11F,
            Command::ReadAlertLimit(AlertLimit::HighClear) => 0xE114,
            Command::ReadAlertLimit(AlertLimit::LowClear) => 0xE109,
            Command::ReadAlertLimit(AlertLimit::LowSet) => 0xE102,
            Command::WriteAlertLimit(AlertLimit::HighSet) => 0x611D,
            Command::WriteAlertLimit(AlertLimit::HighClear) => 0x6116,
            Command::WriteAlertLimit(AlertLimit::LowClear) => 0x610B,
            Command::WriteAlertLimit(AlertLimit::LowSet) => 0x6100,
        }
    }

    /// Number of response bytes the command reads back, CRC bytes included.
    pub const fn response_len(self) -> usize {
        match self {
            Command::ReadSerialNumber | Command::SingleShot(_) | Command::FetchPeriodic => 6,
            Command::ReadStatus | Command::ReadAlertLimit(_) => 3,
            _ => 0,
        }
    }

    /// Encodes the bare command frame.
    pub fn encode(self) -> ArrayVec<u8, MAX_FRAME_LEN> {
        let mut frame = ArrayVec::new();
        frame.extend(self.code().to_be_bytes());
        frame
    }

    /// Encodes a command frame carrying a checksummed data word.
    pub fn encode_with_word(self, word: u16) -> ArrayVec<u8, MAX_FRAME_LEN> {
        let mut frame = self.encode();
        frame.extend(append_crc8(word));
        frame
    }
}
