// src/session/mock.rs

// Shared mock interface for the session tests: staged response frames, a
// write log, programmable NACK windows and a virtual clock that advances
// only through delays.

use core::ops::{Add, Sub};
use core::time::Duration;

use heapless::{Deque, Vec};
use nb::Result as NbResult;

use crate::common::address::SensorAddress;
use crate::common::crc::append_crc8;
use crate::common::hal_traits::{ResetLine, Sht3xBus, Sht3xTimer};

const FRAME_CAP: usize = 8;
const LOG_CAP: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64); // microseconds

impl Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockBusError;

pub struct MockInterface {
    pub now_us: u64,
    pub writes: Vec<Vec<u8, FRAME_CAP>, LOG_CAP>,
    pub reads: Deque<Vec<u8, FRAME_CAP>, LOG_CAP>,
    /// Reads to NACK before the next staged frame is delivered.
    pub nack_reads: u32,
    /// Writes to NACK before the next write is accepted.
    pub nack_writes: u32,
    pub fail_next_write: bool,
    pub fail_next_read: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            now_us: 0,
            writes: Vec::new(),
            reads: Deque::new(),
            nack_reads: 0,
            nack_writes: 0,
            fail_next_write: false,
            fail_next_read: false,
        }
    }

    /// Stages one raw response frame.
    pub fn stage_read(&mut self, bytes: &[u8]) {
        self.reads
            .push_back(Vec::from_slice(bytes).unwrap())
            .unwrap();
    }

    /// Stages a response frame of checksummed big-endian words.
    pub fn stage_words(&mut self, words: &[u16]) {
        let mut frame: Vec<u8, FRAME_CAP> = Vec::new();
        for word in words {
            frame.extend_from_slice(&append_crc8(*word)).unwrap();
        }
        self.reads.push_back(frame).unwrap();
    }

    /// Stages a measurement frame for the given raw readings.
    pub fn stage_measurement(&mut self, raw_temperature: u16, raw_humidity: u16) {
        self.stage_words(&[raw_temperature, raw_humidity]);
    }

    pub fn last_write(&self) -> &[u8] {
        self.writes.last().expect("no write recorded")
    }
}

impl Sht3xTimer for MockInterface {
    type Instant = MockInstant;

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(ms as u64 * 1000);
    }

    fn now(&self) -> Self::Instant {
        MockInstant(self.now_us)
    }
}

impl Sht3xBus for MockInterface {
    type Error = MockBusError;

    fn write_frame(
        &mut self,
        _address: SensorAddress,
        bytes: &[u8],
    ) -> NbResult<(), Self::Error> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(nb::Error::Other(MockBusError));
        }
        if self.nack_writes > 0 {
            self.nack_writes -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.writes
            .push(Vec::from_slice(bytes).unwrap())
            .expect("write log full");
        Ok(())
    }

    fn read_frame(
        &mut self,
        _address: SensorAddress,
        buffer: &mut [u8],
    ) -> NbResult<(), Self::Error> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(nb::Error::Other(MockBusError));
        }
        if self.nack_reads > 0 {
            self.nack_reads -= 1;
            return Err(nb::Error::WouldBlock);
        }
        // No staged frame: the device has nothing to say, which on the bus
        // is a NACK.
        match self.reads.pop_front() {
            Some(frame) => {
                assert_eq!(frame.len(), buffer.len(), "staged frame length mismatch");
                buffer.copy_from_slice(&frame);
                Ok(())
            }
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// Reset line that records the pulse sequence it was driven through.
#[derive(Debug, Default)]
pub struct MockResetLine {
    pub transitions: Vec<bool, 8>, // true = released high
}

impl ResetLine for MockResetLine {
    fn assert_reset(&mut self) {
        self.transitions.push(false).unwrap();
    }

    fn release_reset(&mut self) {
        self.transitions.push(true).unwrap();
    }
}
