use crate::decoder::{DecodeOptions, EntryAssembler, ObfuscationKey};
use crate::errors::AppResult;
use crate::types::{AggregateStats, FieldSelection, Network, OutputField, RawRecord};
use clap::Args;
use serde_json::Value;

/// Decode one chainstate record copied out of LevelDB
#[derive(Args)]
pub struct DecodeCommand {
    /// Record key as hex, starting with the 43 tag byte
    #[arg(long)]
    key: String,

    /// Obfuscated record value as hex
    #[arg(long)]
    value: Option<String>,

    /// Obfuscation key record as hex, length prefix included
    #[arg(long)]
    obfuscation_key: Option<String>,

    /// Encode addresses for testnet
    #[arg(long)]
    testnet: bool,

    /// Give P2PK outputs the address of their public key hash
    #[arg(long)]
    p2pk_addresses: bool,
}

impl DecodeCommand {
    /// Key fields only unless a value is given
    fn fields(&self) -> FieldSelection {
        if self.value.is_some() {
            FieldSelection::new(
                OutputField::ALL
                    .into_iter()
                    .filter(|field| *field != OutputField::Count),
            )
        } else {
            FieldSelection::new([OutputField::Txid, OutputField::Vout])
        }
    }

    pub fn decode(&self) -> AppResult<Value> {
        let record = RawRecord::new(
            hex::decode(self.key.trim())?,
            match &self.value {
                Some(value) => hex::decode(value.trim())?,
                None => Vec::new(),
            },
        );

        let obfuscation_key = match &self.obfuscation_key {
            Some(key) => Some(ObfuscationKey::from_record(&hex::decode(key.trim())?)?),
            None => None,
        };

        let fields = self.fields();
        let options = DecodeOptions {
            fields: fields.clone(),
            network: if self.testnet {
                Network::Testnet
            } else {
                Network::Mainnet
            },
            p2pk_addresses: self.p2pk_addresses,
        };

        let assembler = EntryAssembler::new(obfuscation_key, options)?;
        let entry = assembler.assemble(&record, &mut AggregateStats::new())?;
        Ok(entry.to_json(fields.fields(), 1))
    }

    pub fn run(&self) -> AppResult<()> {
        let decoded = self.decode()?;
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        Ok(())
    }
}
