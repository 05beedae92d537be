use crate::config::AppConfig;
use crate::database::{ChainstateDb, RecordSource};
use crate::errors::AppResult;
use crate::types::Network;
use bitcoin::BlockHash;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct InspectCommand {
    /// Chainstate LevelDB directory (overrides config.toml and env vars)
    #[arg(long = "db", short = 'd')]
    db: Option<PathBuf>,
}

/// What `inspect` reports about a chainstate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainstateInfo {
    pub obfuscation_key: Option<Vec<u8>>,
    pub best_block: Option<BlockHash>,
}

impl ChainstateInfo {
    pub fn read(path: &Path) -> AppResult<Self> {
        let mut db = ChainstateDb::open(path)?;
        let obfuscation_key = db.obfuscation_key()?;
        let best_block = match &obfuscation_key {
            Some(key) => db.best_block(key)?,
            None => None,
        };
        Ok(Self {
            obfuscation_key: obfuscation_key.map(|key| key.as_bytes().to_vec()),
            best_block,
        })
    }
}

impl InspectCommand {
    pub fn run(&self) -> AppResult<()> {
        let path = match &self.db {
            Some(db) => db.clone(),
            None => AppConfig::get_defaults().paths.chainstate,
        };

        let info = ChainstateInfo::read(&path)?;

        println!("Chainstate:       {}", path.display());
        println!(
            "Network (guess):  {}",
            Network::detect_from_path(&path).as_str()
        );
        match &info.obfuscation_key {
            Some(key) => println!("Obfuscation key:  {}", hex::encode(key)),
            None => println!("Obfuscation key:  none"),
        }
        match &info.best_block {
            Some(hash) => println!("Best block:       {}", hash),
            None => println!("Best block:       unknown"),
        }

        Ok(())
    }
}
