//! Parallel batch decoding
//!
//! A batch is split into contiguous chunks, one per worker, and decoded on
//! scoped threads. Results come back in record order and each worker's
//! statistics are merged after the join.

use crate::address::AddressEncoder;
use crate::crypto::PublicKeyDecompressor;
use crate::decoder::{DecodeError, EntryAssembler};
use crate::errors::{AppError, AppResult};
use crate::types::{AggregateStats, ChainstateEntry, RawRecord};
use std::fmt;

/// A record that failed to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Raw key of the failed record
    pub key: Vec<u8>,
    pub error: DecodeError,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", hex::encode(&self.key), self.error)
    }
}

/// Decoded entries and failures of one batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully decoded entries, in input order
    pub entries: Vec<ChainstateEntry>,
    pub errors: Vec<RecordError>,
    pub stats: AggregateStats,
}

impl BatchOutcome {
    fn absorb(&mut self, other: BatchOutcome) {
        self.entries.extend(other.entries);
        self.errors.extend(other.errors);
        self.stats.merge(&other.stats);
    }
}

/// Decodes batches of raw records with a fixed worker count
pub struct DecodeSession<E, D> {
    assembler: EntryAssembler<E, D>,
    workers: usize,
}

impl<E, D> DecodeSession<E, D>
where
    E: AddressEncoder,
    D: PublicKeyDecompressor,
{
    pub fn new(assembler: EntryAssembler<E, D>, workers: usize) -> Self {
        Self {
            assembler,
            workers: workers.max(1),
        }
    }

    pub fn assembler(&self) -> &EntryAssembler<E, D> {
        &self.assembler
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Decode a batch.
    ///
    /// Per-record failures are collected in the outcome. A fatal error (see
    /// [`DecodeError::is_fatal`]) aborts the batch and is returned instead.
    pub fn decode_batch(&self, records: &[RawRecord]) -> AppResult<BatchOutcome> {
        if records.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let threads = self.workers.min(records.len());
        if threads <= 1 {
            return self.decode_chunk(records);
        }

        let chunk_size = records.len().div_ceil(threads);
        let results = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move |_| self.decode_chunk(chunk)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| AppError::Worker("Decoding scope panicked".to_string()))?;

        let mut outcome = BatchOutcome::default();
        for result in results {
            let chunk = result
                .map_err(|_| AppError::Worker("Decoding worker panicked".to_string()))??;
            outcome.absorb(chunk);
        }
        Ok(outcome)
    }

    fn decode_chunk(&self, records: &[RawRecord]) -> AppResult<BatchOutcome> {
        let mut outcome = BatchOutcome {
            entries: Vec::with_capacity(records.len()),
            ..Default::default()
        };

        for record in records {
            match self.assembler.assemble(record, &mut outcome.stats) {
                Ok(entry) => outcome.entries.push(entry),
                Err(error) if error.is_fatal() => return Err(AppError::Decode(error)),
                Err(error) => outcome.errors.push(RecordError {
                    key: record.key.clone(),
                    error,
                }),
            }
        }
        Ok(outcome)
    }
}
