//! Chainstate LevelDB access
//!
//! [`ChainstateDb`] only reads Bitcoin Core's `chainstate` directory. Test
//! fixtures are written with [`fixture::ChainstateWriter`].
//!
//! The node must be stopped while the database is open, LevelDB holds an
//! exclusive lock on the directory.
//!
//! `rusty_leveldb` handles are not `Send`; open and drain a [`ChainstateDb`]
//! on the same thread.

#[doc(hidden)]
pub mod fixture;
pub mod memory;
pub mod traits;

pub use memory::MemorySource;
pub use traits::{is_utxo_key, RecordSource};

use crate::decoder::{ObfuscationKey, OBFUSCATE_KEY_KEY};
use crate::errors::{AppError, AppResult};
use crate::types::RawRecord;
use bitcoin::hashes::Hash;
use bitcoin::BlockHash;
use rusty_leveldb::{DBIterator, LdbIterator, Options, DB};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key of the best block hash record
pub const BEST_BLOCK_KEY: &[u8] = b"B";

/// A chainstate database and its cursor
pub struct ChainstateDb {
    db: DB,
    iter: Option<DBIterator>,
    keys_scanned: u64,
    path: PathBuf,
}

impl ChainstateDb {
    /// Open an existing chainstate directory
    pub fn open(path: &Path) -> AppResult<Self> {
        if !path.is_dir() {
            return Err(AppError::InvalidInput(format!(
                "Couldn't find chainstate directory {}",
                path.display()
            )));
        }

        let mut options = Options::default();
        options.create_if_missing = false;
        let db = DB::open(path, options)?;
        info!("Opened chainstate database at {}", path.display());
        Ok(Self {
            db,
            iter: None,
            keys_scanned: 0,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.db.get(key).map(|value| value.to_vec())
    }

    /// Hash of the block the chainstate is synced to, in display order
    pub fn best_block(&mut self, key: &ObfuscationKey) -> AppResult<Option<BlockHash>> {
        let Some(stored) = self.get(BEST_BLOCK_KEY) else {
            return Ok(None);
        };

        let plain = key.deobfuscate(&stored);
        let bytes: [u8; 32] = plain.get(..32).and_then(|b| b.try_into().ok()).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Best block record too short: {} bytes",
                plain.len()
            ))
        })?;

        Ok(Some(BlockHash::from_byte_array(bytes)))
    }
}

impl RecordSource for ChainstateDb {
    fn obfuscation_key_record(&mut self) -> AppResult<Option<Vec<u8>>> {
        let record = self.get(OBFUSCATE_KEY_KEY);
        debug!(
            "Obfuscation key record: {}",
            record.as_deref().map(hex::encode).unwrap_or_default()
        );
        Ok(record)
    }

    fn fill_batch(&mut self, batch: &mut Vec<RawRecord>, max: usize) -> AppResult<usize> {
        if self.iter.is_none() {
            self.iter = Some(self.db.new_iter()?);
        }
        let Some(iter) = self.iter.as_mut() else {
            return Ok(0);
        };

        let mut added = 0;
        while added < max {
            let Some((key, value)) = LdbIterator::next(iter) else {
                break;
            };
            self.keys_scanned += 1;
            if is_utxo_key(&key) {
                batch.push(RawRecord::new(key.to_vec(), value.to_vec()));
                added += 1;
            }
        }
        Ok(added)
    }

    fn keys_scanned(&self) -> u64 {
        self.keys_scanned
    }
}
