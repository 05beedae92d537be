//! Entry assembly
//!
//! Ties the codecs together: key decoding, de-obfuscation, the three value
//! varints, script classification, optional P2PK expansion and address
//! derivation. Work is skipped whenever the selected output fields do not
//! need it.

use super::amount::decompress_amount;
use super::error::{DecodeError, DecodeResult};
use super::key::decode_key;
use super::obfuscation::ObfuscationKey;
use super::script;
use super::varint::VarintReader;
use crate::address::{AddressEncoder, BitcoinAddressEncoder};
use crate::crypto::pubkey::{stored_to_compressed, PublicKeyDecompressor, Secp256k1Decompressor};
use crate::types::{
    AggregateStats, ChainstateEntry, ChainstateValue, FieldSelection, Network, OutputField,
    RawRecord, ScriptType,
};
use tracing::debug;

/// What the assembler should produce for each record
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub fields: FieldSelection,
    pub network: Network,
    /// Derive P2PKH addresses for P2PK outputs
    pub p2pk_addresses: bool,
}

impl DecodeOptions {
    fn wants_address(&self) -> bool {
        self.fields.contains(OutputField::Address)
    }

    fn wants_expanded_pubkey(&self) -> bool {
        self.fields.contains(OutputField::Script) || (self.wants_address() && self.p2pk_addresses)
    }
}

/// Decode a deobfuscated value into its fields.
///
/// Fixed-size payloads are checked here, so a returned value can always be
/// sliced with [`script::payload`].
pub fn decode_value(plain: &[u8]) -> DecodeResult<ChainstateValue> {
    let mut reader = VarintReader::new(plain);
    let code = reader.read()?;
    let compressed_amount = reader.read()?;
    let (discriminant, script_bytes) = script::read_script(&mut reader)?;

    let amount = decompress_amount(compressed_amount)?;
    let script_type = script::classify(discriminant, script_bytes)?;
    script::payload(script_type, script_bytes)?;

    Ok(ChainstateValue {
        height: code >> 1,
        is_coinbase: code & 1 == 1,
        amount,
        discriminant,
        script_payload: script_bytes.to_vec(),
        script_type,
    })
}

/// Builds [`ChainstateEntry`] values from raw records
pub struct EntryAssembler<E = BitcoinAddressEncoder, D = Secp256k1Decompressor> {
    obfuscation_key: Option<ObfuscationKey>,
    options: DecodeOptions,
    encoder: E,
    decompressor: D,
}

impl EntryAssembler {
    /// Assembler with the default address encoder and key decompressor.
    ///
    /// Fails with [`DecodeError::MissingObfuscationKey`] when a value field is
    /// selected but no key is given.
    pub fn new(
        obfuscation_key: Option<ObfuscationKey>,
        options: DecodeOptions,
    ) -> DecodeResult<Self> {
        Self::with_collaborators(
            obfuscation_key,
            options,
            BitcoinAddressEncoder,
            Secp256k1Decompressor,
        )
    }
}

impl<E: AddressEncoder, D: PublicKeyDecompressor> EntryAssembler<E, D> {
    pub fn with_collaborators(
        obfuscation_key: Option<ObfuscationKey>,
        options: DecodeOptions,
        encoder: E,
        decompressor: D,
    ) -> DecodeResult<Self> {
        if options.fields.needs_value() && obfuscation_key.is_none() {
            return Err(DecodeError::MissingObfuscationKey);
        }
        Ok(Self {
            obfuscation_key,
            options,
            encoder,
            decompressor,
        })
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one record. `stats` is updated only when the whole entry
    /// decodes.
    pub fn assemble(
        &self,
        record: &RawRecord,
        stats: &mut AggregateStats,
    ) -> DecodeResult<ChainstateEntry> {
        let key = decode_key(&record.key)?;
        if !self.options.fields.needs_value() {
            return Ok(ChainstateEntry::key_only(key));
        }

        let obfuscation_key = self
            .obfuscation_key
            .as_ref()
            .ok_or(DecodeError::MissingObfuscationKey)?;
        let value = decode_value(&obfuscation_key.deobfuscate(&record.value))?;

        let expanded_pubkey = if self.options.wants_expanded_pubkey() {
            self.expand_pubkey(&value)
        } else {
            None
        };
        let address = if self.options.wants_address() {
            self.derive_address(&value, expanded_pubkey.as_deref())
        } else {
            None
        };

        stats.record(&key, &value);
        Ok(ChainstateEntry {
            key,
            value: Some(value),
            expanded_pubkey,
            address,
        })
    }

    fn expand_pubkey(&self, value: &ChainstateValue) -> Option<Vec<u8>> {
        if !script::needs_expansion(value.discriminant) {
            return None;
        }
        let expanded = stored_to_compressed(&value.script_payload)
            .and_then(|compressed| self.decompressor.decompress(&compressed));
        if expanded.is_none() {
            debug!(
                "P2PK key {} is not on the curve, leaving it compressed",
                hex::encode(&value.script_payload)
            );
        }
        expanded.map(|key| key.to_vec())
    }

    fn derive_address(&self, value: &ChainstateValue, expanded: Option<&[u8]>) -> Option<String> {
        let script_type = value.script_type;
        if !script_type.has_address() {
            return None;
        }

        let payload = match (script_type, expanded) {
            (ScriptType::P2PK, _) if !self.options.p2pk_addresses => return None,
            (ScriptType::P2PK, Some(expanded)) => expanded,
            // Discriminants 4 and 5 need the expanded key for a correct hash
            (ScriptType::P2PK, None) if script::needs_expansion(value.discriminant) => return None,
            _ => script::payload(script_type, &value.script_payload).ok()?,
        };

        self.encoder
            .encode(script_type, payload, self.options.network)
    }
}
