//! Variable-length signed integers.
//!
//! A first byte below [`VARINT_THRESHOLD`] is the value itself. Otherwise
//! bit 2 of the first byte is the sign and `(b & 3) + 1` big-endian magnitude
//! bytes follow.

use thiserror::Error;

use crate::cursor::ByteSource;

pub const VARINT_THRESHOLD: u8 = 0xf8;
const SIGN_FLAG: u8 = 0x04;
const LEN_MASK: u8 = 0x03;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {0} does not fit in a 4-byte magnitude")]
pub struct VarintRangeError(pub i64);

/// Decodes one integer, or `None` if the source runs out.
pub fn decode_int<S: ByteSource + ?Sized>(src: &mut S) -> Option<i64> {
    let v = src.next_byte()?;
    if v < VARINT_THRESHOLD {
        return Some(i64::from(v));
    }

    let negative = v & SIGN_FLAG != 0;
    let len = (v & LEN_MASK) + 1;
    let mut r: i64 = 0;
    for _ in 0..len {
        r = (r << 8) | i64::from(src.next_byte()?);
    }

    Some(if negative { -r } else { r })
}

/// Appends the encoding of `v` to `out`.
pub fn encode_int(v: i64, out: &mut Vec<u8>) -> Result<(), VarintRangeError> {
    if (0..i64::from(VARINT_THRESHOLD)).contains(&v) {
        out.push(v as u8);
        return Ok(());
    }

    let magnitude = u32::try_from(v.unsigned_abs()).map_err(|_| VarintRangeError(v))?;
    let bytes = magnitude.to_be_bytes();
    let skip = bytes.iter().take(3).take_while(|b| **b == 0).count();
    let len = (bytes.len() - skip) as u8;

    let mut head = VARINT_THRESHOLD | (len - 1);
    if v < 0 {
        head |= SIGN_FLAG;
    }
    out.push(head);
    out.extend_from_slice(&bytes[skip..]);
    Ok(())
}
