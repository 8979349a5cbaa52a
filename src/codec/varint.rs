//! Variable-length packing of color id sequences.
//!
//! Each id is an unsigned number encoded as base-128 digits, least
//! significant digit first, with the high bit of every byte except the last
//! marking a continuation. Encodings are capped at 4 bytes, so the largest
//! representable id is 268,435,455; anything above that is rejected at
//! encode time.
//!
//! Bright ids are preceded by the two-byte marker `0xFE 0x00`. The marker
//! cannot be confused with a plain value: a minimal varint never follows a
//! continuation byte with a 0x00 terminator (that would encode a trailing
//! zero digit), so `0xFE 0x00` at the start of a number is always the
//! marker.

use thiserror::Error;

use crate::token::ColorId;

/// Largest id a 4-byte varint can carry.
pub const MAX_ID: u32 = (1 << 28) - 1;

/// Marker emitted before the varint of a bright id.
const BRIGHT_MARKER: [u8; 2] = [0xFE, 0x00];

/// Most bytes a single varint may occupy.
const MAX_VARINT_BYTES: usize = 4;

/// Errors raised by the varint codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VarIntError {
    /// A numeric id exceeds the 4-byte varint capacity.
    #[error("id {0} exceeds the encodable maximum of {MAX_ID}")]
    Overflow(u32),

    /// Input ended in the middle of a number.
    #[error("truncated varint at byte {0}")]
    Truncated(usize),

    /// A number ran past the 4-byte cap.
    #[error("varint longer than {MAX_VARINT_BYTES} bytes at byte {0}")]
    TooLong(usize),
}

/// Packs a sequence of color ids into bytes.
pub fn encode_ids(ids: &[ColorId]) -> Result<Vec<u8>, VarIntError> {
    let mut out = Vec::with_capacity(ids.len() * 2);
    for id in ids {
        if id.number > MAX_ID {
            return Err(VarIntError::Overflow(id.number));
        }
        if id.bright {
            out.extend_from_slice(&BRIGHT_MARKER);
        }
        let mut value = id.number;
        loop {
            let digit = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                out.push(digit);
                break;
            }
            out.push(digit | 0x80);
        }
    }
    Ok(out)
}

/// Unpacks a byte sequence produced by [`encode_ids`].
///
/// Fails on truncated continuation sequences and on numbers longer than the
/// 4-byte cap rather than reading past the buffer.
pub fn decode_ids(bytes: &[u8]) -> Result<Vec<ColorId>, VarIntError> {
    let mut ids = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let bright = bytes[pos..].starts_with(&BRIGHT_MARKER);
        if bright {
            pos += BRIGHT_MARKER.len();
        }
        let start = pos;
        let mut value: u32 = 0;
        let mut shift = 0;
        loop {
            if pos - start == MAX_VARINT_BYTES {
                return Err(VarIntError::TooLong(start));
            }
            if pos >= bytes.len() {
                return Err(VarIntError::Truncated(start));
            }
            let byte = bytes[pos];
            pos += 1;
            value |= u32::from(byte & 0x7F) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                break;
            }
        }
        ids.push(ColorId {
            number: value,
            bright,
        });
    }
    Ok(ids)
}
