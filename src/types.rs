//! Chainstate Dump - Type System
//!
//! - `entry`: Raw records and decoded entries (RawRecord, ChainstateKey, ChainstateEntry)
//! - `script_type`: Script types recognised in the chainstate
//! - `fields`: Output field selection
//! - `dump`: Dump configuration (DumpConfig, Network, OutputFormat)
//! - `statistics`: Aggregate and session statistics

mod dump;
mod entry;
pub mod fields;
pub mod script_type;
pub mod statistics;

pub use dump::*;
pub use entry::*;
pub use fields::{FieldSelection, OutputField, DEFAULT_FIELDS};
pub use script_type::ScriptType;

pub use statistics::{AggregateStats, SessionStats};
