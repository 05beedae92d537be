use crate::types::{
    default_chainstate_path, default_workers, DumpConfig, FieldSelection, Network, OutputFormat,
    DEFAULT_FIELDS,
};
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub dump: DumpSettings,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub chainstate: PathBuf,
    pub output: PathBuf,
}

/// Output settings of the `dump` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpSettings {
    /// Comma separated field list
    pub fields: String,
    pub format: OutputFormat,
    /// Detected from the chainstate path when unset
    pub network: Option<Network>,
    pub p2pk_addresses: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub workers: usize,
    pub progress_interval_ms: u64,
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default(
                "paths.chainstate",
                default_chainstate_path().to_string_lossy().to_string(),
            )?
            .set_default("paths.output", "utxodump.csv")?
            .set_default("dump.fields", DEFAULT_FIELDS)?
            .set_default("dump.format", "csv")?
            .set_default("dump.p2pk_addresses", false)?
            .set_default("processing.batch_size", 10000)?
            .set_default("processing.workers", default_workers() as i64)?
            .set_default("processing.progress_interval_ms", 500)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // CHAINSTATE_DUMP__FIELDS, CHAINSTATE_PROCESSING__WORKERS, ...
            .add_source(
                config::Environment::with_prefix("CHAINSTATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short names for the two settings changed most often
        if let Ok(path) = env::var("CHAINSTATE_PATH") {
            app_config.paths.chainstate = PathBuf::from(path);
        }

        if let Ok(path) = env::var("CHAINSTATE_OUTPUT") {
            app_config.paths.output = PathBuf::from(path);
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable configuration: {}", e);
                Self::fallback()
            }
        }
    }

    pub(crate) fn fallback() -> Self {
        Self {
            paths: PathsConfig {
                chainstate: default_chainstate_path(),
                output: PathBuf::from("utxodump.csv"),
            },
            dump: DumpSettings {
                fields: DEFAULT_FIELDS.to_string(),
                format: OutputFormat::Csv,
                network: None,
                p2pk_addresses: false,
            },
            processing: ProcessingConfig {
                batch_size: 10000,
                workers: default_workers(),
                progress_interval_ms: 500,
            },
        }
    }

    /// Starting point for a dump before command line overrides
    pub fn dump_config_builder(&self) -> Result<crate::types::DumpConfigBuilder, String> {
        let mut builder = DumpConfig::builder()
            .chainstate_path(&self.paths.chainstate)
            .output_path(&self.paths.output)
            .fields(FieldSelection::parse(&self.dump.fields)?)
            .format(self.dump.format)
            .p2pk_addresses(self.dump.p2pk_addresses)
            .batch_size(self.processing.batch_size)
            .workers(self.processing.workers)
            .progress_interval_ms(self.processing.progress_interval_ms);
        if let Some(network) = self.dump.network {
            builder = builder.network(network);
        }
        Ok(builder)
    }
}
