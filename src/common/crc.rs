// src/common/crc.rs

use super::error::Sht3xError;
use crc::{Algorithm, Crc};

/// CRC algorithm protecting every 16-bit word on the SHT3x bus (CRC-8/NRSC-5).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789")
/// Residue: 0x00
pub const SHT3X_CRC: Algorithm<u8> = Algorithm {
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    width: 8,
    residue: 0x00,
};

// Create a Crc instance for the SHT3x algorithm for reuse.
const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SHT3X_CRC);

/// Calculates the SHT3x CRC-8 for the given data buffer.
///
/// The sensor checksums each 16-bit word separately, so `data` is normally
/// a 2-byte slice.
///
/// # Arguments
///
/// * `data`: A slice of bytes for which to calculate the CRC.
///
/// # Returns
///
/// The calculated 8-bit CRC value.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Verifies a `[msb, lsb, crc]` chunk as received from the sensor.
///
/// # Arguments
///
/// * `chunk`: A 3-byte slice: the big-endian data word followed by its CRC.
///
/// # Returns
///
/// * `Ok(word)` with the decoded big-endian word if the CRC is valid.
/// * `Err(Sht3xError::ChecksumMismatch)` if the CRCs don't match.
///
/// # Panics
///
/// Panics if `chunk` does not have a length of exactly 3.
pub fn verify_word<E>(chunk: &[u8]) -> Result<u16, Sht3xError<E>>
where
    E: core::fmt::Debug,
{
    assert_eq!(chunk.len(), 3, "checksummed word must be 3 bytes long");
    let calculated = calculate_crc8(&chunk[..2]);
    if calculated != chunk[2] {
        return Err(Sht3xError::ChecksumMismatch { expected: chunk[2], calculated });
    }
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
}

/// Encodes an outgoing word as `[msb, lsb, crc]` for write transactions
/// that carry data (alert limit writes).
pub fn append_crc8(word: u16) -> [u8; 3] {
    let [msb, lsb] = word.to_be_bytes();
    [msb, lsb, calculate_crc8(&[msb, lsb])]
}
