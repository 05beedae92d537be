//! Chainstate value de-obfuscation
//!
//! Bitcoin Core XORs every chainstate value with a per-database key so that
//! plaintext patterns do not appear on disk. The key is stored in the database
//! itself under `0x0e 0x00 "obfuscate_key"`; its first byte is a length
//! prefix and is not part of the key.
//!
//! ```text
//!   value:   71a9e87d62de25953e189f706bcf59263f15de1bf6c893bda9b045
//!   key:     b12dcefd8f872536b12dcefd8f872536b12dcefd8f872536b12dce   (repeated)
//!   result:  c0842680ed5900a38f35518de4487c108e3810e6794fb68b189d8b
//! ```

use super::error::{DecodeError, DecodeResult};
use std::fmt;

/// LevelDB key of the obfuscation key record
pub const OBFUSCATE_KEY_KEY: &[u8] = b"\x0e\x00obfuscate_key";

/// The XOR key of one chainstate database, length prefix removed
#[derive(Clone, PartialEq, Eq)]
pub struct ObfuscationKey(Vec<u8>);

impl ObfuscationKey {
    /// Build from the raw database record (length prefix included)
    pub fn from_record(record: &[u8]) -> DecodeResult<Self> {
        match record.split_first() {
            Some((_, key)) => Self::new(key.to_vec()),
            None => Err(DecodeError::MissingObfuscationKey),
        }
    }

    /// Build from key bytes that already have the prefix stripped
    pub fn new(key: Vec<u8>) -> DecodeResult<Self> {
        if key.is_empty() {
            return Err(DecodeError::MissingObfuscationKey);
        }
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// XOR `value` against this key repeated to the value's length
    pub fn deobfuscate(&self, value: &[u8]) -> Vec<u8> {
        value
            .iter()
            .zip(self.0.iter().cycle())
            .map(|(byte, key)| byte ^ key)
            .collect()
    }
}

impl fmt::Debug for ObfuscationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObfuscationKey")
            .field(&hex::encode(&self.0))
            .finish()
    }
}

/// XOR `value` with `key` (prefix already stripped), repeating the key cyclically
pub fn deobfuscate(value: &[u8], key: &[u8]) -> DecodeResult<Vec<u8>> {
    if key.is_empty() {
        return Err(DecodeError::MissingObfuscationKey);
    }
    Ok(value
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect())
}
