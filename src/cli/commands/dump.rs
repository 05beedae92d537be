use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::processor::{format_summary, ChainstateDumper};
use crate::types::{DumpConfig, FieldSelection, Network, OutputFormat};
use clap::Args;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct DumpCommand {
    /// Chainstate LevelDB directory (overrides config.toml and env vars)
    #[arg(long = "db", short = 'd')]
    db: Option<PathBuf>,

    /// Output file, truncated if it exists (overrides config.toml and env vars)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Comma separated fields: count,txid,vout,height,coinbase,amount,nsize,script,type,address
    #[arg(long, short = 'f')]
    fields: Option<String>,

    /// Output format: csv, json or sqlite (overrides config.toml)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Network for address encoding; detected from the chainstate path otherwise
    #[arg(long, value_enum, conflicts_with = "testnet")]
    network: Option<Network>,

    /// Shorthand for --network testnet
    #[arg(long)]
    testnet: bool,

    /// Give P2PK outputs the address of their public key hash
    #[arg(long)]
    p2pk_addresses: bool,

    /// Records decoded per batch (overrides config.toml)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Decoding threads (overrides config.toml)
    #[arg(long, short = 'w')]
    workers: Option<usize>,

    /// Do not print progress or the summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl DumpCommand {
    /// Merge command line flags over the loaded configuration
    pub fn build_config(&self, app_config: &AppConfig) -> AppResult<DumpConfig> {
        let mut builder = app_config
            .dump_config_builder()
            .map_err(AppError::Config)?;

        if let Some(db) = &self.db {
            builder = builder.chainstate_path(db);
        }
        if let Some(output) = &self.output {
            builder = builder.output_path(output);
        }
        if let Some(fields) = &self.fields {
            builder = builder.fields(FieldSelection::parse(fields).map_err(AppError::Config)?);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if self.testnet {
            builder = builder.network(Network::Testnet);
        } else if let Some(network) = self.network {
            builder = builder.network(network);
        }
        if self.p2pk_addresses {
            builder = builder.p2pk_addresses(true);
        }
        if let Some(batch_size) = self.batch_size {
            builder = builder.batch_size(batch_size);
        }
        if let Some(workers) = self.workers {
            builder = builder.workers(workers);
        }

        builder.quiet(self.quiet).build().map_err(AppError::Config)
    }

    pub async fn run(&self) -> AppResult<()> {
        info!("=== Chainstate Dump ===");

        let app_config = AppConfig::get_defaults();
        let config = self.build_config(&app_config)?;

        info!("Configuration:");
        info!("  Chainstate: {}", config.chainstate_path.display());
        info!("  Output: {}", config.output_path.display());
        info!("  Fields: {}", config.fields);
        info!("  Network: {}", config.network.as_str());

        let fields = config.fields.clone();
        let output_path = config.output_path.clone();
        let quiet = config.quiet;

        let dumper = ChainstateDumper::new(config)?;
        let cancel = dumper.cancel_flag();

        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current batch");
                cancel.store(true, Ordering::SeqCst);
            }
        });

        // LevelDB handles stay on one blocking thread for the whole run
        let result = tokio::task::spawn_blocking(move || dumper.run_on_path()).await;
        interrupt.abort();
        let stats = result??;

        if !quiet {
            println!(
                "
=== DUMP COMPLETE ==="
            );
            println!("{}", format_summary(&stats, &fields));
            println!(
                "Processing time: {:.1}s",
                stats.duration().as_secs_f64()
            );
            println!(
                "
Output written to: {}",
                output_path.display()
            );
        }

        Ok(())
    }
}
