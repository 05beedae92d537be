//! Record source abstraction
//!
//! The dump pipeline pulls raw records through [`RecordSource`] so it can run
//! against a real chainstate LevelDB or an in-memory fixture.

use crate::decoder::{ObfuscationKey, UTXO_KEY_TAG};
use crate::errors::AppResult;
use crate::types::RawRecord;

/// Sequential reader of chainstate records
pub trait RecordSource {
    /// The raw obfuscation key record, length prefix included
    fn obfuscation_key_record(&mut self) -> AppResult<Option<Vec<u8>>>;

    /// Append up to `max` unspent output records to `batch`.
    ///
    /// Only keys tagged [`UTXO_KEY_TAG`] are returned. Returns the number of
    /// records added; `0` means the source is exhausted.
    fn fill_batch(&mut self, batch: &mut Vec<RawRecord>, max: usize) -> AppResult<usize>;

    /// Keys read so far, including records that are not unspent outputs
    fn keys_scanned(&self) -> u64;

    /// The parsed obfuscation key. An absent or empty record gives `None`;
    /// whether that is fatal depends on the fields being decoded.
    fn obfuscation_key(&mut self) -> AppResult<Option<ObfuscationKey>> {
        Ok(self
            .obfuscation_key_record()?
            .and_then(|record| ObfuscationKey::from_record(&record).ok()))
    }
}

/// Whether a raw key belongs to an unspent output entry
pub fn is_utxo_key(key: &[u8]) -> bool {
    key.first() == Some(&UTXO_KEY_TAG)
}
