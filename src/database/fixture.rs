//! Chainstate writer for test fixtures
//!
//! Not used by any command. Integration tests build small LevelDB
//! chainstates with it.

use crate::errors::AppResult;
use rusty_leveldb::{Options, DB};
use std::path::Path;

/// Write-only handle on a new or existing LevelDB directory
pub struct ChainstateWriter {
    db: DB,
}

impl ChainstateWriter {
    /// Open `path`, creating an empty database if needed
    pub fn create(path: &Path) -> AppResult<Self> {
        let mut options = Options::default();
        options.create_if_missing = true;
        Ok(Self {
            db: DB::open(path, options)?,
        })
    }

    /// Store a record exactly as given (no obfuscation is applied)
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> AppResult<()> {
        self.db.put(key, value)?;
        Ok(())
    }

    /// Flush pending writes to disk
    pub fn flush(&mut self) -> AppResult<()> {
        self.db.flush()?;
        Ok(())
    }
}
