//! Chainstate dump driver
//!
//! Pulls batches from a [`RecordSource`], decodes them on the worker pool and
//! writes entries in source order. Record-level failures are logged and
//! counted; fatal errors stop the run. An interrupt stops the run after the
//! batch in flight, leaving a valid partial output file.

use super::output::EntryWriter;
use super::progress::{self, ProgressTracker};
use super::session::DecodeSession;
use crate::database::{ChainstateDb, RecordSource};
use crate::decoder::{DecodeOptions, EntryAssembler};
use crate::errors::{AppError, AppResult};
use crate::types::{DumpConfig, FieldSelection, OutputField, SessionStats};
use crate::utils::currency::{format_btc, format_sats_as_btc};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs a dump with a fixed configuration
pub struct ChainstateDumper {
    config: DumpConfig,
    cancel: Arc<AtomicBool>,
}

impl ChainstateDumper {
    pub fn new(config: DumpConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::Config)?;
        Ok(Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Flag that stops the run after the current batch once set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            fields: self.config.fields.clone(),
            network: self.config.network,
            p2pk_addresses: self.config.p2pk_addresses,
        }
    }

    /// Open the configured chainstate and write the configured output file.
    ///
    /// Blocking; run it off the async runtime.
    pub fn run_on_path(&self) -> AppResult<SessionStats> {
        let mut source = ChainstateDb::open(&self.config.chainstate_path)?;
        let mut writer = EntryWriter::create(
            &self.config.output_path,
            self.config.format,
            &self.config.fields,
        )?;
        self.run(&mut source, &mut writer)
    }

    pub fn run<S: RecordSource, W: Write>(
        &self,
        source: &mut S,
        writer: &mut EntryWriter<W>,
    ) -> AppResult<SessionStats> {
        info!(
            "Chainstate dump: batch size {}, {} workers",
            self.config.batch_size, self.config.workers
        );
        info!(
            "  Fields: {} | Network: {}",
            self.config.fields,
            self.config.network.as_str()
        );

        let obfuscation_key = source.obfuscation_key()?;
        match &obfuscation_key {
            Some(key) => info!("Obfuscation key: {}", hex::encode(key.as_bytes())),
            None => warn!("No obfuscation key found in chainstate"),
        }

        let assembler = EntryAssembler::new(obfuscation_key, self.decode_options())?;
        let session = DecodeSession::new(assembler, self.config.workers);

        let mut stats = SessionStats::new();
        let mut batch = Vec::with_capacity(self.config.batch_size);
        let mut progress_tracker = ProgressTracker::new(self.config.progress_interval_ms);

        loop {
            batch.clear();
            let read = source.fill_batch(&mut batch, self.config.batch_size)?;
            if read == 0 {
                break;
            }

            let outcome = session.decode_batch(&batch)?;
            for failure in &outcome.errors {
                warn!("Skipping {}", failure);
            }
            writer.write_batch(&outcome.entries)?;

            stats.total_records += read as u64;
            stats.decoded += outcome.entries.len() as u64;
            stats.failed += outcome.errors.len() as u64;
            stats.batches_processed += 1;
            stats.aggregate.merge(&outcome.stats);

            if !self.config.quiet && progress_tracker.due() {
                progress::print_progress(&stats)?;
            }

            if self.cancel.load(Ordering::SeqCst) {
                warn!(
                    "Interrupted after {} records, output is partial",
                    stats.total_records
                );
                break;
            }
        }

        writer.flush()?;
        stats.keys_scanned = source.keys_scanned();
        stats.finish();

        if !self.config.quiet {
            progress::finish_progress();
        }
        progress::log_completion(&stats);
        info!(
            "Total value: {}",
            format_sats_as_btc(stats.aggregate.total_amount())
        );

        Ok(stats)
    }
}

/// End-of-run summary.
///
/// Amount totals appear only when `amount` was selected, the largest
/// height, vout and script only when any value field was, and per-type
/// counts only when `type` or `address` was.
pub fn format_summary(stats: &SessionStats, fields: &FieldSelection) -> String {
    let mut lines = vec![
        format!("Keys scanned: {}", stats.keys_scanned),
        format!("Total UTXOs: {}", stats.decoded),
    ];

    if stats.failed > 0 {
        lines.push(format!("Skipped records: {}", stats.failed));
    }

    if fields.contains(OutputField::Amount) {
        lines.push(format!(
            "Total BTC:   {}",
            format_btc(stats.aggregate.total_amount())
        ));
    }

    if fields.needs_value() {
        lines.push(format!("Max height:  {}", stats.aggregate.max_height()));
        lines.push(format!("Max vout:    {}", stats.aggregate.max_vout()));
        lines.push(format!(
            "Max script:  {} bytes",
            stats.aggregate.max_script_len()
        ));
    }

    if fields.contains(OutputField::Type) || fields.contains(OutputField::Address) {
        lines.push("Script Types:".to_string());
        for (script_type, count) in stats.aggregate.counts() {
            lines.push(format!(" {:<12} {}", script_type.as_str(), count));
        }
    }

    lines.join("\n")
}
