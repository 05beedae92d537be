//! Decoded chainstate records

use super::fields::OutputField;
use super::script_type::ScriptType;
use serde_json::{json, Value};

/// One key/value pair as stored in the chainstate database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: Vec<u8>,
    /// Still obfuscated
    pub value: Vec<u8>,
}

impl RawRecord {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Outpoint identified by a chainstate key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainstateKey {
    /// Transaction id in stored (little-endian) byte order
    pub txid: [u8; 32],
    pub vout: u64,
}

impl ChainstateKey {
    /// Txid in the byte order block explorers display
    pub fn txid_hex(&self) -> String {
        let mut txid = self.txid;
        txid.reverse();
        hex::encode(txid)
    }
}

/// Fields decoded from a deobfuscated value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainstateValue {
    pub height: u64,
    pub is_coinbase: bool,
    /// Satoshis
    pub amount: u64,
    /// Raw `nSize` varint
    pub discriminant: u64,
    /// Script bytes as stored, starting with the discriminant byte for P2PK
    pub script_payload: Vec<u8>,
    pub script_type: ScriptType,
}

/// A fully assembled unspent output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainstateEntry {
    pub key: ChainstateKey,
    /// `None` when no value field was requested
    pub value: Option<ChainstateValue>,
    /// 65-byte uncompressed key for P2PK outputs stored with discriminant 4 or 5
    pub expanded_pubkey: Option<Vec<u8>>,
    pub address: Option<String>,
}

impl ChainstateEntry {
    pub fn key_only(key: ChainstateKey) -> Self {
        Self {
            key,
            value: None,
            expanded_pubkey: None,
            address: None,
        }
    }

    /// Script bytes for display: the expanded key if there is one, otherwise
    /// the stored payload
    pub fn script(&self) -> Option<&[u8]> {
        match (&self.expanded_pubkey, &self.value) {
            (Some(expanded), _) => Some(expanded),
            (None, Some(value)) => Some(&value.script_payload),
            (None, None) => None,
        }
    }

    /// Text rendering of one field, as written to CSV. `count` is the
    /// 1-based position of the entry in the dump.
    pub fn field_text(&self, field: OutputField, count: u64) -> String {
        match field {
            OutputField::Count => count.to_string(),
            OutputField::Txid => self.key.txid_hex(),
            OutputField::Vout => self.key.vout.to_string(),
            OutputField::Address => self.address.clone().unwrap_or_default(),
            OutputField::Script => self.script().map(hex::encode).unwrap_or_default(),
            _ => match &self.value {
                Some(value) => match field {
                    OutputField::Height => value.height.to_string(),
                    OutputField::Coinbase => u8::from(value.is_coinbase).to_string(),
                    OutputField::Amount => value.amount.to_string(),
                    OutputField::Nsize => value.discriminant.to_string(),
                    OutputField::Type => value.script_type.to_string(),
                    _ => String::new(),
                },
                None => String::new(),
            },
        }
    }

    /// JSON rendering of one field; missing values become `null`
    pub fn field_json(&self, field: OutputField, count: u64) -> Value {
        match field {
            OutputField::Count => json!(count),
            OutputField::Txid => json!(self.key.txid_hex()),
            OutputField::Vout => json!(self.key.vout),
            OutputField::Address => json!(self.address),
            OutputField::Script => json!(self.script().map(hex::encode)),
            _ => match &self.value {
                Some(value) => match field {
                    OutputField::Height => json!(value.height),
                    OutputField::Coinbase => json!(value.is_coinbase),
                    OutputField::Amount => json!(value.amount),
                    OutputField::Nsize => json!(value.discriminant),
                    OutputField::Type => json!(value.script_type),
                    _ => Value::Null,
                },
                None => Value::Null,
            },
        }
    }

    /// JSON object holding the given fields in order
    pub fn to_json(&self, fields: &[OutputField], count: u64) -> Value {
        let object = fields
            .iter()
            .map(|field| (field.as_str().to_string(), self.field_json(*field, count)))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(object)
    }
}
