//! Public key decompression
//!
//! Discriminants 4 and 5 mark an uncompressed P2PK key whose y coordinate
//! was dropped on disk. The stored prefix is the parity tag plus two, so
//! `4 -> 02` and `5 -> 03` restore a standard compressed key.

use bitcoin::secp256k1::PublicKey;

/// Length of a compressed secp256k1 public key
pub const COMPRESSED_KEY_LEN: usize = 33;
/// Length of an uncompressed secp256k1 public key
pub const UNCOMPRESSED_KEY_LEN: usize = 65;

/// Expands compressed public keys to their 65-byte form
pub trait PublicKeyDecompressor: Send + Sync {
    /// Returns `None` when the bytes are not a point on the curve
    fn decompress(&self, compressed: &[u8; COMPRESSED_KEY_LEN])
        -> Option<[u8; UNCOMPRESSED_KEY_LEN]>;
}

/// Decompression backed by libsecp256k1
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Decompressor;

impl PublicKeyDecompressor for Secp256k1Decompressor {
    fn decompress(
        &self,
        compressed: &[u8; COMPRESSED_KEY_LEN],
    ) -> Option<[u8; UNCOMPRESSED_KEY_LEN]> {
        PublicKey::from_slice(compressed)
            .ok()
            .map(|key| key.serialize_uncompressed())
    }
}

/// Turn a key stored under discriminant 4 or 5 back into a standard
/// compressed encoding. Other prefixes and lengths yield `None`.
pub fn stored_to_compressed(stored: &[u8]) -> Option<[u8; COMPRESSED_KEY_LEN]> {
    let mut key: [u8; COMPRESSED_KEY_LEN] = stored.get(..COMPRESSED_KEY_LEN)?.try_into().ok()?;
    key[0] = match key[0] {
        4 | 5 => key[0] - 2,
        _ => return None,
    };
    Some(key)
}
