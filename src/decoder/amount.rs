//! Compact amount codec
//!
//! Output values are stored with trailing decimal zeros folded into an
//! exponent (Bitcoin Core's `CompressAmount`), so round amounts such as
//! 50 BTC serialise to a one-byte varint.

use super::error::{DecodeError, DecodeResult};

/// Recover the satoshi amount from its compressed form.
///
/// Powers of ten are computed with checked integer arithmetic; floating point
/// would lose precision on large amounts.
pub fn decompress_amount(compressed: u64) -> DecodeResult<u64> {
    if compressed == 0 {
        return Ok(0);
    }

    let x = compressed - 1;
    let exponent = (x % 10) as u32;
    let x = x / 10;

    let mantissa = if exponent < 9 {
        let last_digit = x % 9;
        (x / 9) * 10 + last_digit + 1
    } else {
        x + 1
    };

    10u64
        .checked_pow(exponent)
        .and_then(|scale| mantissa.checked_mul(scale))
        .ok_or(DecodeError::AmountOverflow(compressed))
}

/// Compress a satoshi amount the way the node does before writing it.
///
/// Exact inverse of [`decompress_amount`] for every amount up to `u64::MAX / 9`.
pub fn compress_amount(amount: u64) -> u64 {
    if amount == 0 {
        return 0;
    }

    let mut n = amount;
    let mut exponent = 0u64;
    while n % 10 == 0 && exponent < 9 {
        n /= 10;
        exponent += 1;
    }

    if exponent < 9 {
        let last_digit = n % 10;
        n /= 10;
        1u64.wrapping_add(
            n.wrapping_mul(9)
                .wrapping_add(last_digit - 1)
                .wrapping_mul(10),
        )
        .wrapping_add(exponent)
    } else {
        1u64.wrapping_add((n - 1).wrapping_mul(10)).wrapping_add(9)
    }
}
