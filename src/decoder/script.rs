//! Locking script classification
//!
//! The third varint of a chainstate value (`nSize`) is both a type tag and a
//! length. Values 0-5 select Bitcoin Core's special compressed forms; anything
//! from 6 upward is the raw script length plus 6.
//!
//! ```text
//!   0  = P2PKH  <20-byte pubkey hash>
//!   1  = P2SH   <20-byte script hash>
//!   2  = P2PK   02<x>   nSize is the first byte of the public key
//!   3  = P2PK   03<x>
//!   4  = P2PK   04<x><y> stored compressed, y even
//!   5  = P2PK   04<x><y> stored compressed, y odd
//!   6+ = <nSize - 6 raw script bytes>
//! ```

use super::error::{DecodeError, DecodeResult};
use super::varint::VarintReader;
use crate::types::ScriptType;

/// `OP_CHECKMULTISIG`
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// `OP_0`, witness version 0
pub const OP_0: u8 = 0x00;
/// `OP_1`, witness version 1
pub const OP_1: u8 = 0x51;

/// Number of special script forms before raw lengths begin
pub const SPECIAL_SCRIPT_COUNT: u64 = 6;

/// `nSize` of a 22-byte raw script (`0014<20>`)
pub const NSIZE_WITNESS_V0_KEYHASH: u64 = 28;
/// `nSize` of a 34-byte raw script (`0020<32>` or `5120<32>`)
pub const NSIZE_WITNESS_32: u64 = 40;

const HASH160_LEN: usize = 20;
const PUBKEY_LEN: usize = 33;
const WITNESS_HEADER_LEN: usize = 2;

/// Whether the discriminant byte doubles as the first public key byte
pub fn rewinds_cursor(discriminant: u64) -> bool {
    (2..=5).contains(&discriminant)
}

/// Raw script length implied by a discriminant of 6 or more
pub fn declared_script_len(discriminant: u64) -> Option<u64> {
    discriminant.checked_sub(SPECIAL_SCRIPT_COUNT)
}

/// Whether a P2PK key was stored compressed but belongs to an uncompressed key
pub fn needs_expansion(discriminant: u64) -> bool {
    discriminant == 4 || discriminant == 5
}

/// Read the discriminant and slice the script from a value cursor.
///
/// For P2PK discriminants the cursor steps back one byte so the returned
/// script starts with the discriminant byte itself.
pub fn read_script<'a>(reader: &mut VarintReader<'a>) -> DecodeResult<(u64, &'a [u8])> {
    let discriminant = reader.read()?;
    if rewinds_cursor(discriminant) {
        reader.rewind(1);
    }
    Ok((discriminant, reader.remaining()))
}

/// Classify a script from its discriminant and bytes.
///
/// Rules are applied in order and the first match wins, so a long raw script
/// ending in `OP_CHECKMULTISIG` is P2MS even when its size matches a witness
/// program. Every well-shaped input yields exactly one type; a witness-sized
/// discriminant with fewer than two script bytes cannot be tested and is
/// rejected.
pub fn classify(discriminant: u64, script: &[u8]) -> DecodeResult<ScriptType> {
    match discriminant {
        0 => return Ok(ScriptType::P2PKH),
        1 => return Ok(ScriptType::P2SH),
        2..=5 => return Ok(ScriptType::P2PK),
        _ => {}
    }

    if script.last() == Some(&OP_CHECKMULTISIG) {
        return Ok(ScriptType::P2MS);
    }

    if discriminant == NSIZE_WITNESS_V0_KEYHASH || discriminant == NSIZE_WITNESS_32 {
        let [version, push, ..] = script else {
            return Err(DecodeError::UnsupportedScriptShape {
                discriminant,
                len: script.len(),
            });
        };

        let script_type = match (discriminant, *version, *push) {
            (NSIZE_WITNESS_V0_KEYHASH, OP_0, 20) => Some(ScriptType::P2WPKH),
            (NSIZE_WITNESS_32, OP_0, 32) => Some(ScriptType::P2WSH),
            (NSIZE_WITNESS_32, OP_1, 32) => Some(ScriptType::P2TR),
            _ => None,
        };
        if let Some(script_type) = script_type {
            return Ok(script_type);
        }
    }

    Ok(ScriptType::NonStandard)
}

/// The structured payload of a classified script.
///
/// P2PKH/P2SH give the 20-byte hash, P2PK the 33 stored key bytes, witness
/// types the program after the version and push bytes. P2MS and nonstandard
/// scripts have no structured payload and return the script unchanged.
pub fn payload(script_type: ScriptType, script: &[u8]) -> DecodeResult<&[u8]> {
    let (field, start, len) = match script_type {
        ScriptType::P2PKH => ("p2pkh hash", 0, HASH160_LEN),
        ScriptType::P2SH => ("p2sh hash", 0, HASH160_LEN),
        ScriptType::P2PK => ("p2pk public key", 0, PUBKEY_LEN),
        ScriptType::P2WPKH => ("p2wpkh program", WITNESS_HEADER_LEN, 20),
        ScriptType::P2WSH => ("p2wsh program", WITNESS_HEADER_LEN, 32),
        ScriptType::P2TR => ("p2tr program", WITNESS_HEADER_LEN, 32),
        ScriptType::P2MS | ScriptType::NonStandard => return Ok(script),
    };

    script
        .get(start..start + len)
        .ok_or(DecodeError::TruncatedValue {
            field,
            needed: start + len,
            available: script.len(),
        })
}

/// Witness version of segwit script types
pub fn witness_version(script_type: ScriptType) -> Option<u8> {
    match script_type {
        ScriptType::P2WPKH | ScriptType::P2WSH => Some(0),
        ScriptType::P2TR => Some(1),
        _ => None,
    }
}
