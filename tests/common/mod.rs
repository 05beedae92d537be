//! Common Test Utilities
//!
//! Builders for chainstate records and on-disk LevelDB fixtures shared by the
//! unit and integration suites.

#![allow(dead_code)]

use chainstate_dump::database::fixture::ChainstateWriter;
use chainstate_dump::database::BEST_BLOCK_KEY;
use chainstate_dump::decoder::amount::compress_amount;
use chainstate_dump::decoder::key::encode_key;
use chainstate_dump::decoder::varint::encode_varint;
use chainstate_dump::decoder::{ObfuscationKey, OBFUSCATE_KEY_KEY};
use chainstate_dump::types::RawRecord;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Obfuscation key used by every fixture (prefix stripped)
pub const FIXTURE_KEY: [u8; 8] = [0x5a, 0x1c, 0x87, 0x02, 0xee, 0x41, 0x09, 0xb3];

/// The key as stored in the database, length prefix included
pub fn fixture_key_record() -> Vec<u8> {
    let mut record = vec![FIXTURE_KEY.len() as u8];
    record.extend_from_slice(&FIXTURE_KEY);
    record
}

pub fn fixture_key() -> ObfuscationKey {
    ObfuscationKey::new(FIXTURE_KEY.to_vec()).unwrap()
}

/// Plain (not yet obfuscated) value bytes
pub fn plain_value(height: u64, coinbase: bool, amount: u64, nsize: u64, script: &[u8]) -> Vec<u8> {
    let mut value = encode_varint(height * 2 + u64::from(coinbase));
    value.extend(encode_varint(compress_amount(amount)));
    value.extend(encode_varint(nsize));
    value.extend_from_slice(script);
    value
}

/// Description of one unspent output to place in a fixture
#[derive(Debug, Clone)]
pub struct UtxoSpec {
    pub txid: [u8; 32],
    pub vout: u64,
    pub height: u64,
    pub coinbase: bool,
    pub amount: u64,
    pub nsize: u64,
    pub script: Vec<u8>,
}

impl UtxoSpec {
    pub fn p2pkh(seed: u8, vout: u64, amount: u64) -> Self {
        Self {
            txid: [seed; 32],
            vout,
            height: 700_000 + u64::from(seed),
            coinbase: false,
            amount,
            nsize: 0,
            script: vec![seed; 20],
        }
    }

    pub fn p2sh(seed: u8, vout: u64, amount: u64) -> Self {
        Self {
            nsize: 1,
            ..Self::p2pkh(seed, vout, amount)
        }
    }

    /// Version 1 witness program of 32 bytes
    pub fn p2tr(seed: u8, vout: u64, amount: u64) -> Self {
        let mut script = vec![0x51, 0x20];
        script.extend([seed; 32]);
        Self {
            nsize: script.len() as u64 + 6,
            script,
            ..Self::p2pkh(seed, vout, amount)
        }
    }

    pub fn coinbase(mut self) -> Self {
        self.coinbase = true;
        self
    }

    pub fn plain_value(&self) -> Vec<u8> {
        plain_value(self.height, self.coinbase, self.amount, self.nsize, &self.script)
    }

    pub fn record(&self, key: &ObfuscationKey) -> RawRecord {
        RawRecord::new(
            encode_key(&self.txid, self.vout),
            key.deobfuscate(&self.plain_value()),
        )
    }
}

/// A chainstate LevelDB written to a temporary directory
pub struct ChainstateFixture {
    pub dir: TempDir,
}

impl ChainstateFixture {
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("chainstate")
    }
}

/// Builder for on-disk chainstate fixtures
#[derive(Default)]
pub struct ChainstateFixtureBuilder {
    with_key: bool,
    best_block: Option<[u8; 32]>,
    utxos: Vec<UtxoSpec>,
    extra: Vec<(Vec<u8>, Vec<u8>)>,
}

impl ChainstateFixtureBuilder {
    pub fn new() -> Self {
        Self {
            with_key: true,
            ..Self::default()
        }
    }

    pub fn without_obfuscation_key(mut self) -> Self {
        self.with_key = false;
        self
    }

    /// Best block hash in internal byte order
    pub fn best_block(mut self, hash: [u8; 32]) -> Self {
        self.best_block = Some(hash);
        self
    }

    pub fn utxo(mut self, utxo: UtxoSpec) -> Self {
        self.utxos.push(utxo);
        self
    }

    /// Any other record, written without obfuscation
    pub fn raw(mut self, key: &[u8], value: &[u8]) -> Self {
        self.extra.push((key.to_vec(), value.to_vec()));
        self
    }

    pub fn build(self) -> anyhow::Result<ChainstateFixture> {
        let dir = TempDir::new()?;
        let fixture = ChainstateFixture { dir };
        write_fixture(&fixture.path(), &self)?;
        Ok(fixture)
    }
}

fn write_fixture(path: &Path, builder: &ChainstateFixtureBuilder) -> anyhow::Result<()> {
    let mut db = ChainstateWriter::create(path)?;
    let key = fixture_key();

    if builder.with_key {
        db.put(OBFUSCATE_KEY_KEY, &fixture_key_record())?;
    }
    if let Some(hash) = builder.best_block {
        db.put(BEST_BLOCK_KEY, &key.deobfuscate(&hash))?;
    }
    for utxo in &builder.utxos {
        let record = utxo.record(&key);
        db.put(&record.key, &record.value)?;
    }
    for (raw_key, raw_value) in &builder.extra {
        db.put(raw_key, raw_value)?;
    }

    db.flush()?;
    Ok(())
}
