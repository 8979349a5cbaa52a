//! Base85 transcoding between bytes and query-safe text.
//!
//! Every 4 input bytes become 5 output characters (a final partial chunk of
//! k bytes becomes k+1 characters), computed as base-85 positional digits,
//! most significant first. The alphabet is fixed to 85 printable ASCII
//! characters that survive a query string untouched: it avoids the payload
//! delimiters `.` and `,`, the pair separator `&`, the fragment marker `#`,
//! the escape character `%`, and everything the WHATWG query serializer
//! percent-escapes. `=` is kept; inside a parameter value it is unambiguous.

use thiserror::Error;

/// The 85-symbol alphabet: digits, letters, and 23 query-safe punctuation
/// characters.
pub(crate) const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!$()*+-/:;=?@[\\]^_`{|}~";

const INVALID: u8 = 0xFF;

const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Errors raised while decoding base85 text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Base85Error {
    /// A character outside the 85-symbol alphabet.
    #[error("character '{character}' at position {position} is not in the base85 alphabet")]
    InvalidCharacter { character: char, position: usize },

    /// A trailing group of a single character carries no whole byte.
    #[error("truncated base85 group at position {0}")]
    TruncatedGroup(usize),

    /// A 5-character group that decodes past the 32-bit range.
    #[error("base85 group at position {0} is out of range")]
    GroupOutOfRange(usize),
}

/// Encodes bytes as base85 text. Empty input encodes to the empty string.
pub fn to_base85(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() / 4 * 5 + 5);
    for chunk in bytes.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(word);

        let mut digits = [0u8; 5];
        for slot in digits.iter_mut().rev() {
            *slot = (value % 85) as u8;
            value /= 85;
        }
        for &digit in digits.iter().take(chunk.len() + 1) {
            out.push(ALPHABET[digit as usize] as char);
        }
    }
    out
}

/// Decodes base85 text produced by [`to_base85`].
pub fn from_base85(text: &str) -> Result<Vec<u8>, Base85Error> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 5 * 4 + 4);
    let mut pos = 0;
    while pos < bytes.len() {
        let group = &bytes[pos..(pos + 5).min(bytes.len())];
        if group.len() == 1 {
            return Err(Base85Error::TruncatedGroup(pos));
        }

        let mut value: u64 = 0;
        for (offset, &ch) in group.iter().enumerate() {
            let digit = DECODE[ch as usize];
            if digit == INVALID {
                return Err(Base85Error::InvalidCharacter {
                    character: ch as char,
                    position: pos + offset,
                });
            }
            value = value * 85 + u64::from(digit);
        }
        // Pad the missing low digits with the maximum symbol. The padded
        // positions only influence the bytes dropped below.
        for _ in group.len()..5 {
            value = value * 85 + 84;
        }
        if value > u64::from(u32::MAX) {
            return Err(Base85Error::GroupOutOfRange(pos));
        }

        let word = (value as u32).to_be_bytes();
        out.extend_from_slice(&word[..group.len() - 1]);
        pos += group.len();
    }
    Ok(out)
}
