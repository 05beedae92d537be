//! Batch reading from LevelDB and in-memory sources

use crate::common::{fixture_key, fixture_key_record, ChainstateFixtureBuilder, UtxoSpec};
use chainstate_dump::database::{ChainstateDb, MemorySource, RecordSource};
use chainstate_dump::types::RawRecord;

#[test]
fn test_leveldb_batches_cover_every_utxo_in_key_order() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .utxo(UtxoSpec::p2pkh(3, 0, 100))
        .utxo(UtxoSpec::p2pkh(1, 0, 100))
        .utxo(UtxoSpec::p2sh(2, 5, 100))
        .utxo(UtxoSpec::p2pkh(1, 1, 100))
        .utxo(UtxoSpec::p2tr(4, 0, 100))
        .build()?;

    let mut db = ChainstateDb::open(&fixture.path())?;
    let mut batch = Vec::new();
    let mut all = Vec::new();
    loop {
        batch.clear();
        if db.fill_batch(&mut batch, 2)? == 0 {
            break;
        }
        assert!(batch.len() <= 2);
        all.append(&mut batch);
    }

    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|record| record.key[0] == 0x43));
    let seeds: Vec<u8> = all.iter().map(|record| record.key[1]).collect();
    assert_eq!(seeds, vec![1, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_leveldb_skips_metadata_records() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .best_block([0x11; 32])
        .raw(b"F\x07txindex", b"\x01")
        .utxo(UtxoSpec::p2pkh(9, 0, 546))
        .build()?;

    let mut db = ChainstateDb::open(&fixture.path())?;
    let mut batch = Vec::new();
    assert_eq!(db.fill_batch(&mut batch, 100)?, 1);
    assert_eq!(db.fill_batch(&mut batch, 100)?, 0);
    // obfuscation key, best block, flag and the one output
    assert_eq!(db.keys_scanned(), 4);
    Ok(())
}

#[test]
fn test_leveldb_obfuscation_key() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new().build()?;
    let mut db = ChainstateDb::open(&fixture.path())?;
    assert_eq!(db.obfuscation_key_record()?, Some(fixture_key_record()));
    assert_eq!(db.obfuscation_key()?, Some(fixture_key()));

    let fixture = ChainstateFixtureBuilder::new()
        .without_obfuscation_key()
        .build()?;
    let mut db = ChainstateDb::open(&fixture.path())?;
    assert_eq!(db.obfuscation_key()?, None);
    Ok(())
}

#[test]
fn test_missing_directory_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = ChainstateDb::open(&dir.path().join("nope"));
    let message = result.err().unwrap().to_string();
    assert!(message.contains("Couldn't find chainstate directory"));
}

#[test]
fn test_memory_source_matches_insertion_order() -> anyhow::Result<()> {
    let key = fixture_key();
    let mut source = MemorySource::new(Some(fixture_key_record())).with_records([
        UtxoSpec::p2pkh(5, 0, 1).record(&key),
        RawRecord::new(b"B".to_vec(), vec![0; 32]),
        UtxoSpec::p2pkh(2, 0, 1).record(&key),
    ]);

    let mut batch = Vec::new();
    assert_eq!(source.fill_batch(&mut batch, 10)?, 2);
    assert_eq!(batch[0].key[1], 5);
    assert_eq!(batch[1].key[1], 2);
    assert_eq!(source.fill_batch(&mut batch, 10)?, 0);
    assert_eq!(source.keys_scanned(), 3);
    Ok(())
}
