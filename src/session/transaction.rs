// src/session/transaction.rs

use core::fmt::Debug;
use core::time::Duration;

use nb::Result as NbResult;

use crate::common::address::SensorAddress;
use crate::common::command::Command;
use crate::common::crc::verify_word;
use crate::common::error::Sht3xError;
use crate::common::hal_traits::{Sht3xBus, Sht3xTimer};
use crate::common::timing;
use crate::common::types::{Measurement, StatusRegister};

use super::Sht3xSession;

// Largest response frame on the bus (serial number / measurement).
const MAX_RESPONSE_LEN: usize = 6;

impl<IF> Sht3xSession<IF>
where
    IF: Sht3xBus + Sht3xTimer,
    IF::Error: Debug,
{
    /// Writes a bare command frame, waiting out NACK windows up to the
    /// write-acknowledge timeout.
    pub(super) fn write_command(&mut self, command: Command) -> Result<(), Sht3xError<IF::Error>> {
        let frame = command.encode();
        self.blocking_io_with_deadline(timing::WRITE_ACK_TIMEOUT, |iface, address| {
            iface.write_frame(address, &frame)
        })
    }

    /// Writes a command frame carrying a checksummed data word.
    pub(super) fn write_command_with_word(
        &mut self,
        command: Command,
        word: u16,
    ) -> Result<(), Sht3xError<IF::Error>> {
        let frame = command.encode_with_word(word);
        self.blocking_io_with_deadline(timing::WRITE_ACK_TIMEOUT, |iface, address| {
            iface.write_frame(address, &frame)
        })
    }

    /// Reads `COUNT` CRC-protected words within `timeout`.
    ///
    /// The whole frame arrives in one bus transaction; each word is
    /// verified before the frame is accepted, and a single bad checksum
    /// fails the read (retrying is a caller concern).
    pub(super) fn read_words<const COUNT: usize>(
        &mut self,
        timeout: Duration,
    ) -> Result<[u16; COUNT], Sht3xError<IF::Error>> {
        let mut raw = [0u8; MAX_RESPONSE_LEN];
        let len = COUNT * 3;
        debug_assert!(len <= raw.len());

        self.blocking_io_with_deadline(timeout, |iface, address| {
            iface.read_frame(address, &mut raw[..len])
        })?;

        let mut words = [0u16; COUNT];
        for (word, chunk) in words.iter_mut().zip(raw[..len].chunks_exact(3)) {
            *word = verify_word(chunk)?;
        }
        Ok(words)
    }

    /// Reads one 6-byte measurement frame and converts it.
    pub(super) fn read_measurement(
        &mut self,
        timeout: Duration,
    ) -> Result<Measurement, Sht3xError<IF::Error>> {
        let [raw_temperature, raw_humidity] = self.read_words::<2>(timeout)?;
        Ok(Measurement::from_raw(raw_temperature, raw_humidity))
    }

    /// Reads and decodes the status register.
    pub(super) fn read_status_word(&mut self) -> Result<StatusRegister, Sht3xError<IF::Error>> {
        self.write_command(Command::ReadStatus)?;
        self.delay(timing::COMMAND_LATENCY);
        let [word] = self.read_words::<1>(timing::READ_TIMEOUT)?;
        Ok(StatusRegister::from_word(word))
    }

    /// Confirms via the status register that the device executed the last
    /// command; a set command-status flag becomes `CommandFailed`.
    pub(super) fn verify_command_accepted(&mut self) -> Result<(), Sht3xError<IF::Error>> {
        let status = self.read_status_word()?;
        if status.command_failed() {
            return Err(Sht3xError::CommandFailed);
        }
        Ok(())
    }

    pub(super) fn delay(&mut self, duration: Duration) {
        self.interface.delay_us(duration.as_micros() as u32);
    }

    // --- Deadline Helper ---

    /// Runs one nb-based exchange to completion, bounded by `timeout`.
    ///
    /// `WouldBlock` (device not acknowledging) polls again after a short
    /// interval; a hard bus error or an expired deadline ends the exchange.
    pub(super) fn blocking_io_with_deadline<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, Sht3xError<IF::Error>>
    where
        FN: FnMut(&mut IF, SensorAddress) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;

        loop {
            match f(&mut self.interface, self.address) {
                Ok(value) => return Ok(value),
                Err(nb::Error::Other(e)) => return Err(Sht3xError::Bus(e)),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() > deadline {
                        return Err(Sht3xError::Timeout);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL.as_micros() as u32);
                }
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::mock::{MockBusError, MockInterface};
    use super::super::Sht3xSession;
    use crate::common::command::Command;
    use crate::common::crc::append_crc8;
    use crate::common::error::Sht3xError;
    use crate::common::timing;
    use crate::common::types::Repeatability;
    use crate::common::SensorAddress;

    fn session(interface: MockInterface) -> Sht3xSession<MockInterface> {
        Sht3xSession::new(interface, SensorAddress::AdrHigh)
    }

    #[test]
    fn test_write_command_logs_frame() {
        let mut session = session(MockInterface::new());
        session.write_command(Command::SoftReset).unwrap();
        assert_eq!(session.interface.last_write(), &[0x30, 0xA2]);
    }

    #[test]
    fn test_write_command_with_word_appends_crc() {
        let mut session = session(MockInterface::new());
        session
            .write_command_with_word(Command::WriteAlertLimit(crate::common::AlertLimit::LowSet), 0x1234)
            .unwrap();
        let expected_tail = append_crc8(0x1234);
        let frame = session.interface.last_write();
        assert_eq!(&frame[..2], &[0x61, 0x00]);
        assert_eq!(&frame[2..], &expected_tail);
    }

    #[test]
    fn test_read_words_verifies_each_checksum() {
        let mut interface = MockInterface::new();
        interface.stage_words(&[0xBEEF, 0x1234]);
        let mut session = session(interface);
        let words = session.read_words::<2>(timing::READ_TIMEOUT).unwrap();
        assert_eq!(words, [0xBEEF, 0x1234]);
    }

    #[test]
    fn test_read_words_rejects_corrupted_frame() {
        let mut interface = MockInterface::new();
        let mut frame = [0u8; 6];
        frame[..3].copy_from_slice(&append_crc8(0xBEEF));
        frame[3..].copy_from_slice(&append_crc8(0x1234));
        frame[5] ^= 0xFF; // flip the second CRC
        interface.stage_read(&frame);
        let mut session = session(interface);

        let result = session.read_words::<2>(timing::READ_TIMEOUT);
        assert!(matches!(result, Err(Sht3xError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_read_times_out_when_device_stays_silent() {
        // Nothing staged: every read NACKs, the virtual clock advances
        // through the poll delays until the deadline expires.
        let mut session = session(MockInterface::new());
        let before = session.interface.now_us;
        let result = session.read_words::<1>(timing::READ_TIMEOUT);
        assert!(matches!(result, Err(Sht3xError::Timeout)));
        assert!(session.interface.now_us >= before + timing::READ_TIMEOUT.as_micros() as u64);
    }

    #[test]
    fn test_read_survives_nack_window() {
        // The device NACKs a few times (conversion in progress), then the
        // frame comes through.
        let mut interface = MockInterface::new();
        interface.nack_reads = 4;
        interface.stage_words(&[0x8010]);
        let mut session = session(interface);
        let [word] = session.read_words::<1>(timing::READ_TIMEOUT).unwrap();
        assert_eq!(word, 0x8010);
    }

    #[test]
    fn test_bus_fault_is_propagated() {
        let mut interface = MockInterface::new();
        interface.fail_next_write = true;
        let mut session = session(interface);
        let result = session.write_command(Command::SingleShot(Repeatability::High));
        assert!(matches!(result, Err(Sht3xError::Bus(MockBusError))));
    }

    #[test]
    fn test_verify_command_accepted() {
        let mut interface = MockInterface::new();
        interface.stage_words(&[0x0000]);
        let mut session = session(interface);
        session.verify_command_accepted().unwrap();
        // Command-status bit set: the device rejected the last command.
        session.interface.stage_words(&[0x0002]);
        let result = session.verify_command_accepted();
        assert!(matches!(result, Err(Sht3xError::CommandFailed)));
    }
}
