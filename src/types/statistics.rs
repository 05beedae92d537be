//! Statistics for dump sessions
//!
//! Workers each keep an [`AggregateStats`] while decoding and the session
//! merges them once a batch is done, so counting never needs a lock.

use super::entry::{ChainstateKey, ChainstateValue};
use super::script_type::ScriptType;
use crate::utils::math::safe_percentage;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Per-type output counts, the satoshi total and the largest values seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    script_type_counts: BTreeMap<ScriptType, u64>,
    total_amount: u64,
    max_height: u64,
    max_vout: u64,
    max_script_len: usize,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStats {
    /// Every script type starts at zero so the summary always lists them all
    pub fn new() -> Self {
        Self {
            script_type_counts: ScriptType::ALL.into_iter().map(|t| (t, 0)).collect(),
            total_amount: 0,
            max_height: 0,
            max_vout: 0,
            max_script_len: 0,
        }
    }

    /// Count one decoded output
    pub fn record(&mut self, key: &ChainstateKey, value: &ChainstateValue) {
        *self.script_type_counts.entry(value.script_type).or_insert(0) += 1;
        self.total_amount = self.total_amount.saturating_add(value.amount);
        self.max_height = self.max_height.max(value.height);
        self.max_vout = self.max_vout.max(key.vout);
        self.max_script_len = self.max_script_len.max(value.script_payload.len());
    }

    /// Fold another collector's counts into this one
    pub fn merge(&mut self, other: &AggregateStats) {
        for (script_type, count) in &other.script_type_counts {
            *self.script_type_counts.entry(*script_type).or_insert(0) += count;
        }
        self.total_amount = self.total_amount.saturating_add(other.total_amount);
        self.max_height = self.max_height.max(other.max_height);
        self.max_vout = self.max_vout.max(other.max_vout);
        self.max_script_len = self.max_script_len.max(other.max_script_len);
    }

    pub fn count(&self, script_type: ScriptType) -> u64 {
        self.script_type_counts
            .get(&script_type)
            .copied()
            .unwrap_or(0)
    }

    /// Counts in [`ScriptType`] order
    pub fn counts(&self) -> impl Iterator<Item = (ScriptType, u64)> + '_ {
        self.script_type_counts.iter().map(|(t, c)| (*t, *c))
    }

    /// Satoshis across all counted outputs
    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn total_outputs(&self) -> u64 {
        self.script_type_counts.values().sum()
    }

    pub fn max_height(&self) -> u64 {
        self.max_height
    }

    pub fn max_vout(&self) -> u64 {
        self.max_vout
    }

    /// Longest stored script, in bytes
    pub fn max_script_len(&self) -> usize {
        self.max_script_len
    }
}

/// Statistics of one dump session
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Every key read from the database, metadata records included
    pub keys_scanned: u64,
    /// Unspent output records read, including failures
    pub total_records: u64,
    pub decoded: u64,
    pub failed: u64,
    pub batches_processed: u64,
    pub aggregate: AggregateStats,
    started: Instant,
    finished: Option<Duration>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            keys_scanned: 0,
            total_records: 0,
            decoded: 0,
            failed: 0,
            batches_processed: 0,
            aggregate: AggregateStats::new(),
            started: Instant::now(),
            finished: None,
        }
    }

    /// Stop the clock; later calls keep the first duration
    pub fn finish(&mut self) {
        if self.finished.is_none() {
            self.finished = Some(self.started.elapsed());
        }
    }

    /// Run time so far, or the final run time once finished
    pub fn duration(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }

    /// Unspent output records per second
    pub fn records_per_second(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs > 0.0 {
            self.total_records as f64 / secs
        } else {
            0.0
        }
    }

    pub fn error_rate(&self) -> f64 {
        safe_percentage(self.failed, self.total_records)
    }

    /// One-line summary for the completion log
    pub fn summary(&self) -> String {
        format!(
            "{} records in {} batches, {} decoded, {} failed ({:.2}%), {:.0} records/sec",
            self.total_records,
            self.batches_processed,
            self.decoded,
            self.failed,
            self.error_rate(),
            self.records_per_second()
        )
    }
}
