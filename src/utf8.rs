//! Minimal UTF-8 codec used by the `\uHHHH` escape.
//!
//! Works on raw code points rather than `char`, so surrogate values are
//! encoded with the generic three-byte form instead of being rejected.

use thiserror::Error;

/// Largest code point the codec accepts.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Codec failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Error {
    /// The lead byte announces more octets than the input holds.
    #[error("missing utf-8 octet: expected {expected}, got {available}")]
    Truncated { expected: usize, available: usize },

    /// The first byte is a continuation byte or an invalid lead.
    #[error("invalid utf-8 lead byte 0x{0:02x}")]
    InvalidLead(u8),

    /// The code point lies above [`MAX_CODE_POINT`].
    #[error("code point 0x{0:x} is outside the unicode range")]
    OutOfRange(u32),
}

/// Number of octets needed to encode `code_point`, if it is encodable.
pub fn encoded_len(code_point: u32) -> Option<usize> {
    match code_point {
        0..=0x7F => Some(1),
        0x80..=0x7FF => Some(2),
        0x800..=0xFFFF => Some(3),
        0x1_0000..=MAX_CODE_POINT => Some(4),
        _ => None,
    }
}

/// Encodes a code point into 1 to 4 octets.
pub fn encode(code_point: u32) -> Result<Vec<u8>, Utf8Error> {
    let len = encoded_len(code_point).ok_or(Utf8Error::OutOfRange(code_point))?;
    let cp = code_point;
    let bytes = match len {
        1 => vec![cp as u8],
        2 => vec![0b1100_0000 | (cp >> 6) as u8 & 0b0001_1111, continuation(cp)],
        3 => vec![
            0b1110_0000 | (cp >> 12) as u8 & 0b0000_1111,
            continuation(cp >> 6),
            continuation(cp),
        ],
        _ => vec![
            0b1111_0000 | (cp >> 18) as u8 & 0b0000_0111,
            continuation(cp >> 12),
            continuation(cp >> 6),
            continuation(cp),
        ],
    };
    Ok(bytes)
}

/// Decodes the first code point of `input`.
///
/// Returns the code point and the number of octets it occupied.
pub fn decode(input: &[u8]) -> Result<(u32, usize), Utf8Error> {
    let Some(&lead) = input.first() else {
        return Err(Utf8Error::Truncated {
            expected: 1,
            available: 0,
        });
    };

    let (len, initial) = match lead {
        0x00..=0x7F => return Ok((u32::from(lead), 1)),
        _ if lead & 0b1110_0000 == 0b1100_0000 => (2, u32::from(lead & 0b0001_1111)),
        _ if lead & 0b1111_0000 == 0b1110_0000 => (3, u32::from(lead & 0b0000_1111)),
        _ if lead & 0b1111_1000 == 0b1111_0000 => (4, u32::from(lead & 0b0000_0111)),
        _ => return Err(Utf8Error::InvalidLead(lead)),
    };

    if input.len() < len {
        return Err(Utf8Error::Truncated {
            expected: len,
            available: input.len(),
        });
    }

    let code_point = input[1..len]
        .iter()
        .fold(initial, |acc, byte| (acc << 6) | u32::from(byte & 0b0011_1111));
    Ok((code_point, len))
}

fn continuation(bits: u32) -> u8 {
    0b1000_0000 | (bits as u8 & 0b0011_1111)
}
