//! Typed value codec
//!
//! Exact, symmetric binary encode/decode for the three supported value
//! kinds. All multi-byte encodings are big-endian, matching the S7 memory
//! layout: INT is two's-complement, REAL is IEEE-754 single precision.
//!
//! These functions are pure and stateless; buffers are caller-owned
//! scratch and never retained.

use crate::error::{Result, S7LinkError};

/// Encode an i16 as 2 big-endian two's-complement bytes
#[inline]
pub fn encode_int16(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Decode exactly 2 big-endian bytes as an i16
pub fn decode_int16(buf: &[u8]) -> Result<i16> {
    if buf.len() < 2 {
        return Err(S7LinkError::validation(format!(
            "INT16 needs 2 bytes, got {}",
            buf.len()
        )));
    }
    Ok(i16::from_be_bytes([buf[0], buf[1]]))
}

/// Encode an f32 as 4 big-endian IEEE-754 bytes
#[inline]
pub fn encode_float32(value: f32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Decode exactly 4 big-endian bytes as an f32
pub fn decode_float32(buf: &[u8]) -> Result<f32> {
    if buf.len() < 4 {
        return Err(S7LinkError::validation(format!(
            "FLOAT32 needs 4 bytes, got {}",
            buf.len()
        )));
    }
    Ok(f32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

/// Extract bit `bit_offset` (0 = least significant) of the first byte.
///
/// A short or empty buffer reads as an all-zero byte, so degraded
/// upstream paths yield `false` instead of a panic.
#[inline]
pub fn decode_bool(buf: &[u8], bit_offset: u8) -> bool {
    debug_assert!(bit_offset < 8, "bit offset out of range: {}", bit_offset);
    let byte = buf.first().copied().unwrap_or(0);
    (byte >> bit_offset) & 0x01 != 0
}

/// Set or clear bit `bit_offset` of the first byte, leaving the other
/// seven bits untouched.
///
/// Read-modify-write contract: the caller passes in the byte it just read
/// from the device; only the targeted bit changes. An empty buffer (a
/// mis-sized upstream read) is extended with a zero byte rather than
/// rejected.
pub fn encode_bool_into(buf: &mut Vec<u8>, bit_offset: u8, value: bool) {
    debug_assert!(bit_offset < 8, "bit offset out of range: {}", bit_offset);
    if buf.is_empty() {
        buf.push(0);
    }
    if value {
        buf[0] |= 1 << bit_offset;
    } else {
        buf[0] &= !(1 << bit_offset);
    }
}
