//! Output field selection
//!
//! Users pick output columns with a comma separated list such as
//! `count,txid,vout,amount`. The selection also decides how much work each
//! record needs: when only key fields are requested, values are never
//! deobfuscated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field list used when none is given
pub const DEFAULT_FIELDS: &str = "count,txid,vout,amount,type,address";

/// A single output column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputField {
    Count,
    Txid,
    Vout,
    Height,
    Coinbase,
    Amount,
    Nsize,
    Script,
    Type,
    Address,
}

impl OutputField {
    pub const ALL: [OutputField; 10] = [
        OutputField::Count,
        OutputField::Txid,
        OutputField::Vout,
        OutputField::Height,
        OutputField::Coinbase,
        OutputField::Amount,
        OutputField::Nsize,
        OutputField::Script,
        OutputField::Type,
        OutputField::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputField::Count => "count",
            OutputField::Txid => "txid",
            OutputField::Vout => "vout",
            OutputField::Height => "height",
            OutputField::Coinbase => "coinbase",
            OutputField::Amount => "amount",
            OutputField::Nsize => "nsize",
            OutputField::Script => "script",
            OutputField::Type => "type",
            OutputField::Address => "address",
        }
    }

    /// Whether the field comes from the record value rather than the key
    pub fn from_value(&self) -> bool {
        !matches!(
            self,
            OutputField::Count | OutputField::Txid | OutputField::Vout
        )
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = OutputField::ALL.iter().map(|f| f.as_str()).collect();
                format!(
                    "'{}' is not a field you can use for the output. Choose from: {}",
                    s,
                    allowed.join(",")
                )
            })
    }
}

/// Ordered, de-duplicated set of requested output fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<OutputField>,
}

impl FieldSelection {
    /// Build from fields in output order; later duplicates are dropped
    pub fn new(fields: impl IntoIterator<Item = OutputField>) -> Self {
        let mut selected = Vec::new();
        for field in fields {
            if !selected.contains(&field) {
                selected.push(field);
            }
        }
        Self { fields: selected }
    }

    /// Parse a comma separated field list
    pub fn parse(list: &str) -> Result<Self, String> {
        let fields = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(OutputField::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if fields.is_empty() {
            return Err("At least one output field must be selected".to_string());
        }

        Ok(Self::new(fields))
    }

    /// All fields, in their canonical order
    pub fn all() -> Self {
        Self::new(OutputField::ALL)
    }

    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    pub fn contains(&self, field: OutputField) -> bool {
        self.fields.contains(&field)
    }

    /// Whether any selected field requires decoding the value
    pub fn needs_value(&self) -> bool {
        self.fields.iter().any(OutputField::from_value)
    }

    /// Column names in output order
    pub fn header(&self) -> Vec<&'static str> {
        self.fields.iter().map(OutputField::as_str).collect()
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::new([
            OutputField::Count,
            OutputField::Txid,
            OutputField::Vout,
            OutputField::Amount,
            OutputField::Type,
            OutputField::Address,
        ])
    }
}

impl FromStr for FieldSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header().join(","))
    }
}
