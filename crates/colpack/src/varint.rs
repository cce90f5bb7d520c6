//! LEB128 varints and zig-zag signed encoding.
//!
//! Writers append to a `Vec<u8>`; readers parse the front of a byte slice and
//! return the decoded value together with the number of bytes consumed.

use crate::error::DecodeError;

/// A `u32` varint never needs more than 5 bytes (ceil(32 / 7)).
pub const MAX_U32_VARINT_BYTES: usize = 5;
/// A `u64` varint never needs more than 10 bytes (ceil(64 / 7)).
pub const MAX_U64_VARINT_BYTES: usize = 10;

pub fn write_u32(out: &mut Vec<u8>, mut v: u32) {
    loop {
        let mut byte = (v & 0x7F) as u8;
        v >>= 7;
        if v != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if v == 0 {
            return;
        }
    }
}

pub fn write_u64(out: &mut Vec<u8>, mut v: u64) {
    loop {
        let mut byte = (v & 0x7F) as u8;
        v >>= 7;
        if v != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if v == 0 {
            return;
        }
    }
}

/// Write `v` zig-zag encoded, so small magnitudes of either sign stay short.
pub fn write_zigzag_i32(out: &mut Vec<u8>, v: i32) {
    write_u32(out, zigzag_encode(v));
}

/// Map a signed value onto the unsigned line: 0, -1, 1, -2, 2, ... -> 0, 1, 2, 3, 4, ...
pub fn zigzag_encode(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

pub fn zigzag_decode(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}

/// Read a `u32` varint from the front of `input`.
///
/// `context` names what is being read; it is carried into the error so a
/// malformed page reports which field was truncated.
pub fn read_u32(input: &[u8], context: &'static str) -> Result<(u32, usize), DecodeError> {
    let mut v: u32 = 0;
    for i in 0..MAX_U32_VARINT_BYTES {
        let byte = *input
            .get(i)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        v |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((v, i + 1));
        }
    }
    Err(DecodeError::VarintTooLong { context })
}

/// Read a `u64` varint from the front of `input`.
pub fn read_u64(input: &[u8], context: &'static str) -> Result<(u64, usize), DecodeError> {
    let mut v: u64 = 0;
    for i in 0..MAX_U64_VARINT_BYTES {
        let byte = *input
            .get(i)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        v |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((v, i + 1));
        }
    }
    Err(DecodeError::VarintTooLong { context })
}

pub fn read_zigzag_i32(input: &[u8], context: &'static str) -> Result<(i32, usize), DecodeError> {
    let (v, n) = read_u32(input, context)?;
    Ok((zigzag_decode(v), n))
}
