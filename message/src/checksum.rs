//! Frame integrity checksum.
//!
//! CRC-32/ISO-HDLC (reflected 0x04c11db7, init and xorout all-ones) over the
//! plaintext frame body, stored little-endian in the last four bytes of the
//! frame. The algorithm is part of the wire contract: both ends must agree
//! bit-for-bit, so it is named exactly once, here.

use crc::{
    Crc,
    CRC_32_ISO_HDLC,
};

pub const CRC_SIZE: usize = 4;

const FRAME_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

#[inline]
pub fn frame_crc(body: &[u8]) -> u32 {
    FRAME_CRC.checksum(body)
}
