//! Dump run configuration
//!
//! `DumpConfig` is what a single `dump` invocation runs with, resolved from
//! the application config layers and command line flags.

use super::fields::FieldSelection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Network whose address encoding is used
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Testnet when the chainstate path mentions it, mainnet otherwise
    pub fn detect_from_path(path: &Path) -> Self {
        if path.to_string_lossy().contains("testnet") {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl From<Network> for bitcoin::Network {
    fn from(network: Network) -> Self {
        match network {
            Network::Mainnet => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
        }
    }
}

/// Output file format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header row followed by one row per output
    #[default]
    Csv,
    /// One JSON object per line
    Json,
    /// SQLite database with a `utxos` table keyed by outpoint
    Sqlite,
}

/// Configuration for one chainstate dump
#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub chainstate_path: PathBuf,
    pub output_path: PathBuf,
    pub fields: FieldSelection,
    pub format: OutputFormat,
    pub network: Network,
    /// Derive P2PKH-style addresses for P2PK outputs
    pub p2pk_addresses: bool,
    pub batch_size: usize,
    pub workers: usize,
    pub progress_interval_ms: u64,
    /// Suppress the progress line and summary
    pub quiet: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            chainstate_path: default_chainstate_path(),
            output_path: "utxodump.csv".into(),
            fields: FieldSelection::default(),
            format: OutputFormat::Csv,
            network: Network::Mainnet,
            p2pk_addresses: false,
            batch_size: 10_000,
            workers: default_workers(),
            progress_interval_ms: 500,
            quiet: false,
        }
    }
}

/// `~/.bitcoin/chainstate`, or a relative `chainstate` without a home directory
pub fn default_chainstate_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".bitcoin").join("chainstate"),
        None => PathBuf::from("chainstate"),
    }
}

/// One worker per available core
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Builder for DumpConfig with validation
#[derive(Debug, Default)]
pub struct DumpConfigBuilder {
    chainstate_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    fields: Option<FieldSelection>,
    format: Option<OutputFormat>,
    network: Option<Network>,
    p2pk_addresses: bool,
    batch_size: Option<usize>,
    workers: Option<usize>,
    progress_interval_ms: Option<u64>,
    quiet: bool,
}

impl DumpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chainstate_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.chainstate_path = Some(path.into());
        self
    }

    pub fn output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn fields(mut self, fields: FieldSelection) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Force a network; without this it is detected from the chainstate path
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn p2pk_addresses(mut self, enabled: bool) -> Self {
        self.p2pk_addresses = enabled;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn progress_interval_ms(mut self, interval: u64) -> Self {
        self.progress_interval_ms = Some(interval);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the configuration with validation
    pub fn build(self) -> Result<DumpConfig, String> {
        let defaults = DumpConfig::default();
        let chainstate_path = self.chainstate_path.unwrap_or(defaults.chainstate_path);
        let network = self
            .network
            .unwrap_or_else(|| Network::detect_from_path(&chainstate_path));

        let config = DumpConfig {
            chainstate_path,
            output_path: self.output_path.unwrap_or(defaults.output_path),
            fields: self.fields.unwrap_or(defaults.fields),
            format: self.format.unwrap_or(defaults.format),
            network,
            p2pk_addresses: self.p2pk_addresses,
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            workers: self.workers.unwrap_or(defaults.workers),
            progress_interval_ms: self
                .progress_interval_ms
                .unwrap_or(defaults.progress_interval_ms),
            quiet: self.quiet,
        };

        config.validate()?;
        Ok(config)
    }
}

impl DumpConfig {
    pub fn builder() -> DumpConfigBuilder {
        DumpConfigBuilder::new()
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("Batch size cannot be zero".to_string());
        }

        if self.workers == 0 {
            return Err("Worker count cannot be zero".to_string());
        }

        if self.progress_interval_ms == 0 {
            return Err("Progress interval cannot be zero".to_string());
        }

        if self.fields.fields().is_empty() {
            return Err("At least one output field must be selected".to_string());
        }

        if self.output_path.as_os_str().is_empty() {
            return Err("Output path cannot be empty".to_string());
        }

        Ok(())
    }
}
