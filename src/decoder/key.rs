//! Chainstate record keys
//!
//! ```text
//!   430000155b9869d56c66d9e86e3c01de38e3892a42b99949fe109ac034fff6583900
//!   <><--------------------------------------------------------------><>
//!   /                               |                                  \
//! tag                       txid (little-endian)                   vout (varint)
//! ```

use super::error::{DecodeError, DecodeResult};
use super::varint::{decode_varint, encode_varint, read_varint};
use crate::types::ChainstateKey;

/// Record tag of unspent output entries (`'C'`)
pub const UTXO_KEY_TAG: u8 = 0x43;

const TXID_START: usize = 1;
const TXID_END: usize = 33;

/// Parse a raw chainstate key into txid (stored order) and output index.
///
/// The tag byte is not checked; callers filter on [`UTXO_KEY_TAG`].
pub fn decode_key(raw: &[u8]) -> DecodeResult<ChainstateKey> {
    if raw.len() < TXID_END {
        return Err(DecodeError::TruncatedKey { len: raw.len() });
    }

    let mut txid = [0u8; 32];
    txid.copy_from_slice(&raw[TXID_START..TXID_END]);

    let (encoded, consumed) = read_varint(raw, TXID_END);
    if consumed == 0 {
        return Err(DecodeError::TruncatedVarint { offset: TXID_END });
    }
    let vout = decode_varint(encoded)?;

    Ok(ChainstateKey { txid, vout })
}

/// Build the raw key of an unspent output from a stored-order txid
pub fn encode_key(txid: &[u8; 32], vout: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(TXID_END + 3);
    key.push(UTXO_KEY_TAG);
    key.extend_from_slice(txid);
    key.extend(encode_varint(vout));
    key
}
