//! Address derivation for decoded scripts
//!
//! Addresses are produced with rust-bitcoin's encoders: base58check for
//! P2PKH/P2SH (and P2PK when requested, via the key's hash160), bech32 for
//! SegWit v0 and bech32m for Taproot.

use crate::decoder::script::witness_version;
use crate::types::{Network, ScriptType};
use bitcoin::hashes::Hash;
use bitcoin::{Address, PubkeyHash, PublicKey, ScriptHash, WitnessProgram, WitnessVersion};

/// Encodes script payloads as addresses
pub trait AddressEncoder: Send + Sync {
    /// `payload` is the 20-byte hash for P2PKH/P2SH, the serialised public
    /// key for P2PK and the witness program for SegWit types.
    ///
    /// Returns `None` for types without an address form or malformed payloads.
    fn encode(&self, script_type: ScriptType, payload: &[u8], network: Network)
        -> Option<String>;
}

/// [`AddressEncoder`] backed by the `bitcoin` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BitcoinAddressEncoder;

impl AddressEncoder for BitcoinAddressEncoder {
    fn encode(
        &self,
        script_type: ScriptType,
        payload: &[u8],
        network: Network,
    ) -> Option<String> {
        let network = bitcoin::Network::from(network);

        let address = match script_type {
            ScriptType::P2PKH => Address::p2pkh(PubkeyHash::from_slice(payload).ok()?, network),
            ScriptType::P2SH => {
                Address::p2sh_from_hash(ScriptHash::from_slice(payload).ok()?, network)
            }
            ScriptType::P2PK => {
                let key = PublicKey::from_slice(payload).ok()?;
                Address::p2pkh(key.pubkey_hash(), network)
            }
            ScriptType::P2WPKH | ScriptType::P2WSH | ScriptType::P2TR => {
                let version = match witness_version(script_type)? {
                    0 => WitnessVersion::V0,
                    _ => WitnessVersion::V1,
                };
                let program = WitnessProgram::new(version, payload).ok()?;
                Address::from_witness_program(program, network)
            }
            ScriptType::P2MS | ScriptType::NonStandard => return None,
        };

        Some(address.to_string())
    }
}
