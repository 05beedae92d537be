//! Locking script types recognised in the chainstate
//!
//! The set mirrors what a compressed chainstate script can express: the six
//! special forms collapse to P2PKH, P2SH and P2PK, and raw scripts are
//! recognised by shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Script type of an unspent output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// Pay-to-PubKey (legacy)
    P2PK,
    /// Pay-to-PubKey-Hash
    P2PKH,
    /// Pay-to-Script-Hash
    P2SH,
    /// Bare multisig (`... OP_CHECKMULTISIG`)
    P2MS,
    /// Pay-to-Witness-PubKey-Hash (SegWit v0)
    P2WPKH,
    /// Pay-to-Witness-Script-Hash (SegWit v0)
    P2WSH,
    /// Pay-to-Taproot (SegWit v1)
    P2TR,
    /// Anything else, including OP_RETURN outputs
    #[serde(rename = "non-standard")]
    NonStandard,
}

impl ScriptType {
    /// Every type, in summary order
    pub const ALL: [ScriptType; 8] = [
        ScriptType::P2PK,
        ScriptType::P2PKH,
        ScriptType::P2SH,
        ScriptType::P2MS,
        ScriptType::P2WPKH,
        ScriptType::P2WSH,
        ScriptType::P2TR,
        ScriptType::NonStandard,
    ];

    /// Name used in CSV/JSON output and in the summary
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::P2PK => "p2pk",
            ScriptType::P2PKH => "p2pkh",
            ScriptType::P2SH => "p2sh",
            ScriptType::P2MS => "p2ms",
            ScriptType::P2WPKH => "p2wpkh",
            ScriptType::P2WSH => "p2wsh",
            ScriptType::P2TR => "p2tr",
            ScriptType::NonStandard => "non-standard",
        }
    }

    /// Whether an address can be derived for this type at all
    pub fn has_address(&self) -> bool {
        !matches!(self, ScriptType::P2MS | ScriptType::NonStandard)
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
