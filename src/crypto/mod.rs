//! Cryptographic helpers for chainstate scripts
//!
//! Chainstate stores every P2PK key in 33 bytes, including keys that were
//! uncompressed in the original output. Recovering the full 65-byte key
//! needs a point decompression on secp256k1.
pub mod pubkey;

pub use pubkey::{PublicKeyDecompressor, Secp256k1Decompressor};
