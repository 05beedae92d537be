//! Bitcoin Core Chainstate UTXO Dump
//!

pub mod address;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod database;
pub mod decoder;
pub mod errors;
pub mod processor;
pub mod types;
pub mod utils;
