//! Chainstate varint codec
//!
//! The chainstate serialises heights, amounts, script sizes and output indexes
//! with Bitcoin Core's `VARINT` format, not CompactSize and not LEB128. Bytes
//! are big-endian base-128 groups, the high bit marks continuation, and every
//! continuation byte adds one to the accumulator before the next group is
//! shifted in:
//!
//! ```text
//!   b9 82 76
//!   b9 -> 0x39 = 57, continuation        -> 58
//!   82 -> (58 << 7) | 0x02 = 7426, cont. -> 7427
//!   76 -> (7427 << 7) | 0x76             = 950774
//! ```

use super::error::{DecodeError, DecodeResult};

const CONTINUATION_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Split one varint off `bytes` starting at `offset`.
///
/// Returns the encoded bytes and how many were consumed. The last consumed
/// byte is the first one at or after `offset` with the high bit clear. When no
/// such byte exists the consumed count is `0` and the returned slice is the
/// unterminated tail.
pub fn read_varint(bytes: &[u8], offset: usize) -> (&[u8], usize) {
    let tail = bytes.get(offset..).unwrap_or(&[]);
    match tail.iter().position(|b| b & CONTINUATION_BIT == 0) {
        Some(last) => (&tail[..=last], last + 1),
        None => (tail, 0),
    }
}

/// Decode the bytes of a single varint (as returned by [`read_varint`]).
///
/// Magnitudes beyond 64 bits are reported as [`DecodeError::VarintOverflow`]
/// rather than wrapped.
pub fn decode_varint(bytes: &[u8]) -> DecodeResult<u64> {
    let mut n: u64 = 0;
    for &byte in bytes {
        if n > u64::MAX >> 7 {
            return Err(DecodeError::VarintOverflow);
        }
        n = (n << 7) | u64::from(byte & PAYLOAD_MASK);
        if byte & CONTINUATION_BIT != 0 {
            n = n.checked_add(1).ok_or(DecodeError::VarintOverflow)?;
        }
    }
    Ok(n)
}

/// Encode `n` in the chainstate varint format
pub fn encode_varint(mut n: u64) -> Vec<u8> {
    let mut groups = Vec::with_capacity(10);
    loop {
        let marker = if groups.is_empty() { 0 } else { CONTINUATION_BIT };
        groups.push((n as u8 & PAYLOAD_MASK) | marker);
        if n <= u64::from(PAYLOAD_MASK) {
            break;
        }
        n = (n >> 7) - 1;
    }
    groups.reverse();
    groups
}

/// Cursor that reads consecutive varints from a deobfuscated value.
///
/// Each read starts exactly where the previous one ended.
#[derive(Debug, Clone)]
pub struct VarintReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> VarintReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current byte offset into the underlying slice
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read and decode the next varint, advancing the cursor
    pub fn read(&mut self) -> DecodeResult<u64> {
        let (encoded, consumed) = read_varint(self.bytes, self.offset);
        if consumed == 0 {
            return Err(DecodeError::TruncatedVarint {
                offset: self.offset,
            });
        }
        let value = decode_varint(encoded)?;
        self.offset += consumed;
        Ok(value)
    }

    /// Move the cursor back by `n` bytes
    pub fn rewind(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Bytes from the cursor to the end of the input
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset.min(self.bytes.len())..]
    }
}
