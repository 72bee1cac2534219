//! CRC-32 (ISO-HDLC) message checksums.

use crc::{CRC_32_ISO_HDLC, Crc};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CRC-32 of `data`.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

/// CRC-32 of `data` as big-endian bytes.
#[must_use]
pub fn crc32_bytes(data: &[u8]) -> [u8; 4] {
    crc32(data).to_be_bytes()
}
