//! In-memory record source

use super::traits::{is_utxo_key, RecordSource};
use crate::errors::AppResult;
use crate::types::RawRecord;
use std::collections::VecDeque;

/// [`RecordSource`] over records held in memory, returned in insertion order
#[derive(Debug, Default)]
pub struct MemorySource {
    obfuscation_key_record: Option<Vec<u8>>,
    records: VecDeque<RawRecord>,
    keys_scanned: u64,
}

impl MemorySource {
    pub fn new(obfuscation_key_record: Option<Vec<u8>>) -> Self {
        Self {
            obfuscation_key_record,
            records: VecDeque::new(),
            keys_scanned: 0,
        }
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = RawRecord>) -> Self {
        self.records.extend(records);
        self
    }
}

impl RecordSource for MemorySource {
    fn obfuscation_key_record(&mut self) -> AppResult<Option<Vec<u8>>> {
        Ok(self.obfuscation_key_record.clone())
    }

    fn fill_batch(&mut self, batch: &mut Vec<RawRecord>, max: usize) -> AppResult<usize> {
        let mut added = 0;
        while added < max {
            let Some(record) = self.records.pop_front() else {
                break;
            };
            self.keys_scanned += 1;
            if is_utxo_key(&record.key) {
                batch.push(record);
                added += 1;
            }
        }
        Ok(added)
    }

    fn keys_scanned(&self) -> u64 {
        self.keys_scanned
    }
}
