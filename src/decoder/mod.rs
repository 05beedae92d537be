//! Chainstate record decoding
//!
//! Bottom-up codecs for the records Bitcoin Core keeps in its `chainstate`
//! LevelDB, and the assembler that turns one raw key/value pair into a
//! [`ChainstateEntry`](crate::types::ChainstateEntry).
//!
//! - `varint`: Core's VARINT codec and a cursor over value bytes
//! - `obfuscation`: XOR key handling
//! - `amount`: compressed amount codec
//! - `key`: outpoint keys
//! - `script`: script classification and payload extraction
//! - `entry`: record assembly

pub mod amount;
pub mod entry;
pub mod error;
pub mod key;
pub mod obfuscation;
pub mod script;
pub mod varint;

pub use entry::{decode_value, DecodeOptions, EntryAssembler};
pub use error::{DecodeError, DecodeResult};
pub use key::{decode_key, UTXO_KEY_TAG};
pub use obfuscation::{ObfuscationKey, OBFUSCATE_KEY_KEY};
