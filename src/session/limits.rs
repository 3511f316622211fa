// src/session/limits.rs

//! Alert limit configuration.
//!
//! The device stores each alert threshold as one packed word: the top 7
//! bits of the raw humidity value and the top 9 bits of the raw temperature
//! value share a 16-bit register. Writing one side therefore reads the
//! current word first and preserves the other side's bits.

use core::fmt::Debug;

use crate::common::command::{AlertLimit, Command};
use crate::common::error::Sht3xError;
use crate::common::hal_traits::{Sht3xBus, Sht3xTimer};
use crate::common::timing;

use super::Sht3xSession;

/// One alert window.
///
/// Thresholds must be strictly ordered:
/// `high_set > high_clear > low_clear > low_set`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlertLimits {
    /// Raising threshold of the upper alert.
    pub high_set: f32,
    /// Release threshold of the upper alert.
    pub high_clear: f32,
    /// Release threshold of the lower alert.
    pub low_clear: f32,
    /// Raising threshold of the lower alert.
    pub low_set: f32,
}

impl AlertLimits {
    fn validate<E: Debug>(&self) -> Result<(), Sht3xError<E>> {
        if self.high_set > self.high_clear
            && self.high_clear > self.low_clear
            && self.low_clear > self.low_set
        {
            Ok(())
        } else {
            Err(Sht3xError::InvalidLimits)
        }
    }
}

// The four slots in the order the device documentation writes them.
const SLOTS: [AlertLimit; 4] = [
    AlertLimit::HighSet,
    AlertLimit::HighClear,
    AlertLimit::LowClear,
    AlertLimit::LowSet,
];

fn slot_value(limits: &AlertLimits, slot: AlertLimit) -> f32 {
    match slot {
        AlertLimit::HighSet => limits.high_set,
        AlertLimit::HighClear => limits.high_clear,
        AlertLimit::LowClear => limits.low_clear,
        AlertLimit::LowSet => limits.low_set,
    }
}

// --- Raw packing helpers ---

fn raw_temperature(value_c: f32) -> u16 {
    ((value_c + 45.0) / 175.0 * 65535.0) as u16
}

fn raw_humidity(value_rh: f32) -> u16 {
    (value_rh / 100.0 * 65535.0) as u16
}

/// Replaces the temperature half (low 9 bits) of a packed limit word.
fn pack_temperature(limit_word: u16, value_c: f32) -> u16 {
    (raw_temperature(value_c) >> 7) | (limit_word & 0xFE00)
}

/// Replaces the humidity half (top 7 bits) of a packed limit word.
fn pack_humidity(limit_word: u16, value_rh: f32) -> u16 {
    (raw_humidity(value_rh) & 0xFE00) | (limit_word & 0x01FF)
}

/// Temperature readback. The bits dropped by packing are filled with the
/// interval midpoint (0x1A), so the result is the center of the stored bin.
fn unpack_temperature(limit_word: u16) -> f32 {
    let raw = ((limit_word << 7) & 0xFF80) | 0x001A;
    175.0 * raw as f32 / 65535.0 - 45.0
}

/// Humidity readback; midpoint fill 0xCD.
fn unpack_humidity(limit_word: u16) -> f32 {
    let raw = (limit_word & 0xFE00) | 0x00CD;
    100.0 * raw as f32 / 65535.0
}

fn fahrenheit_to_celsius(value_f: f32) -> f32 {
    (value_f - 32.0) * 5.0 / 9.0
}

fn celsius_to_fahrenheit(value_c: f32) -> f32 {
    value_c * 9.0 / 5.0 + 32.0
}

impl<IF> Sht3xSession<IF>
where
    IF: Sht3xBus + Sht3xTimer,
    IF::Error: Debug,
{
    /// Configures the temperature alert window, degrees Celsius.
    ///
    /// Valid range is the sensor's -40..125 degC span; the window must be
    /// strictly ordered or the call fails with `InvalidLimits` before any
    /// bus traffic.
    pub fn set_temperature_limits(
        &mut self,
        limits: AlertLimits,
    ) -> Result<(), Sht3xError<IF::Error>> {
        limits.validate()?;
        for slot in SLOTS {
            self.update_limit_word(slot, slot_value(&limits, slot), pack_temperature)?;
        }
        Ok(())
    }

    /// Configures the temperature alert window, degrees Fahrenheit.
    pub fn set_temperature_limits_f(
        &mut self,
        limits: AlertLimits,
    ) -> Result<(), Sht3xError<IF::Error>> {
        self.set_temperature_limits(AlertLimits {
            high_set: fahrenheit_to_celsius(limits.high_set),
            high_clear: fahrenheit_to_celsius(limits.high_clear),
            low_clear: fahrenheit_to_celsius(limits.low_clear),
            low_set: fahrenheit_to_celsius(limits.low_set),
        })
    }

    /// Configures the relative humidity alert window, %RH.
    pub fn set_humidity_limits(
        &mut self,
        limits: AlertLimits,
    ) -> Result<(), Sht3xError<IF::Error>> {
        limits.validate()?;
        for slot in SLOTS {
            self.update_limit_word(slot, slot_value(&limits, slot), pack_humidity)?;
        }
        Ok(())
    }

    /// Reads back the temperature alert window, degrees Celsius.
    ///
    /// Values come back quantized to the 9 bits the device stores.
    pub fn temperature_limits(&mut self) -> Result<AlertLimits, Sht3xError<IF::Error>> {
        let words = self.read_limit_words()?;
        Ok(AlertLimits {
            high_set: unpack_temperature(words[0]),
            high_clear: unpack_temperature(words[1]),
            low_clear: unpack_temperature(words[2]),
            low_set: unpack_temperature(words[3]),
        })
    }

    /// Reads back the temperature alert window, degrees Fahrenheit.
    pub fn temperature_limits_f(&mut self) -> Result<AlertLimits, Sht3xError<IF::Error>> {
        let limits = self.temperature_limits()?;
        Ok(AlertLimits {
            high_set: celsius_to_fahrenheit(limits.high_set),
            high_clear: celsius_to_fahrenheit(limits.high_clear),
            low_clear: celsius_to_fahrenheit(limits.low_clear),
            low_set: celsius_to_fahrenheit(limits.low_set),
        })
    }

    /// Reads back the relative humidity alert window, %RH.
    pub fn humidity_limits(&mut self) -> Result<AlertLimits, Sht3xError<IF::Error>> {
        let words = self.read_limit_words()?;
        Ok(AlertLimits {
            high_set: unpack_humidity(words[0]),
            high_clear: unpack_humidity(words[1]),
            low_clear: unpack_humidity(words[2]),
            low_set: unpack_humidity(words[3]),
        })
    }

    // --- Word-level helpers ---

    fn update_limit_word(
        &mut self,
        slot: AlertLimit,
        value: f32,
        pack: fn(u16, f32) -> u16,
    ) -> Result<(), Sht3xError<IF::Error>> {
        let current = self.read_limit_word(slot)?;
        self.write_limit_word(slot, pack(current, value))
    }

    fn read_limit_words(&mut self) -> Result<[u16; 4], Sht3xError<IF::Error>> {
        let mut words = [0u16; 4];
        for (word, slot) in words.iter_mut().zip(SLOTS) {
            *word = self.read_limit_word(slot)?;
        }
        Ok(words)
    }

    fn read_limit_word(&mut self, slot: AlertLimit) -> Result<u16, Sht3xError<IF::Error>> {
        self.write_command(Command::ReadAlertLimit(slot))?;
        self.delay(timing::COMMAND_LATENCY);
        let [word] = self.read_words::<1>(timing::READ_TIMEOUT)?;
        Ok(word)
    }

    fn write_limit_word(
        &mut self,
        slot: AlertLimit,
        word: u16,
    ) -> Result<(), Sht3xError<IF::Error>> {
        self.write_command_with_word(Command::WriteAlertLimit(slot), word)?;
        self.delay(timing::COMMAND_LATENCY);
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::mock::MockInterface;
    use super::super::Sht3xSession;
    use super::*;
    use crate::common::SensorAddress;

    fn session(interface: MockInterface) -> Sht3xSession<MockInterface> {
        Sht3xSession::new(interface, SensorAddress::AdrHigh)
    }

    #[test]
    fn test_pack_temperature_preserves_humidity_bits() {
        let packed = pack_temperature(0xFE00, 25.0);
        assert_eq!(packed & 0xFE00, 0xFE00);
        // 25 degC raw is 0x6666; its top 9 bits land in the low half.
        assert_eq!(packed & 0x01FF, 0x6666 >> 7);
    }

    #[test]
    fn test_pack_humidity_preserves_temperature_bits() {
        let packed = pack_humidity(0x01FF, 80.0);
        assert_eq!(packed & 0x01FF, 0x01FF);
        assert_eq!(packed & 0xFE00, raw_humidity(80.0) & 0xFE00);
    }

    #[test]
    fn test_unpack_temperature_round_trip() {
        // 9-bit quantization: one step is 175 / 512 ~ 0.34 degC.
        for value in [-35.0f32, 0.0, 25.0, 60.0, 120.0] {
            let unpacked = unpack_temperature(pack_temperature(0, value));
            assert!(
                (unpacked - value).abs() < 0.5,
                "temperature {value} came back as {unpacked}"
            );
        }
    }

    #[test]
    fn test_unpack_humidity_round_trip() {
        // 7-bit quantization: one step is 100 / 128 ~ 0.8 %RH.
        for value in [5.0f32, 20.0, 55.0, 90.0] {
            let unpacked = unpack_humidity(pack_humidity(0, value));
            assert!(
                (unpacked - value).abs() < 1.0,
                "humidity {value} came back as {unpacked}"
            );
        }
    }

    #[test]
    fn test_unordered_limits_rejected_before_bus_traffic() {
        let mut session = session(MockInterface::new());
        let result = session.set_temperature_limits(AlertLimits {
            high_set: 10.0,
            high_clear: 20.0, // inverted
            low_clear: 5.0,
            low_set: 0.0,
        });
        assert!(matches!(result, Err(Sht3xError::InvalidLimits)));
        assert!(session.interface.writes.is_empty());
    }

    #[test]
    fn test_set_temperature_limits_rewrites_all_four_slots() {
        let mut interface = MockInterface::new();
        for _ in 0..4 {
            interface.stage_words(&[0x0000]); // current word read back per slot
        }
        let mut session = session(interface);
        session
            .set_temperature_limits(AlertLimits {
                high_set: 60.0,
                high_clear: 58.0,
                low_clear: -8.0,
                low_set: -10.0,
            })
            .unwrap();

        // read + write per slot
        assert_eq!(session.interface.writes.len(), 8);
        let write_codes: Vec<u16> = session
            .interface
            .writes
            .iter()
            .filter(|frame| frame.len() == 5)
            .map(|frame| u16::from_be_bytes([frame[0], frame[1]]))
            .collect();
        assert_eq!(write_codes, [0x611D, 0x6116, 0x610B, 0x6100]);
    }

    #[test]
    fn test_humidity_limits_read_back() {
        let mut interface = MockInterface::new();
        for value in [90.0f32, 85.0, 25.0, 20.0] {
            interface.stage_words(&[pack_humidity(0, value)]);
        }
        let mut session = session(interface);
        let limits = session.humidity_limits().unwrap();
        assert!((limits.high_set - 90.0).abs() < 1.0);
        assert!((limits.high_clear - 85.0).abs() < 1.0);
        assert!((limits.low_clear - 25.0).abs() < 1.0);
        assert!((limits.low_set - 20.0).abs() < 1.0);
        assert!(limits.high_set > limits.high_clear);
    }
}
