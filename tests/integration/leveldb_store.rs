//! Chainstate metadata read back from LevelDB

use crate::common::{fixture_key, ChainstateFixtureBuilder, UtxoSpec};
use chainstate_dump::cli::commands::inspect::ChainstateInfo;
use chainstate_dump::database::{ChainstateDb, BEST_BLOCK_KEY};

fn block_hash_bytes() -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash[0] = 0x6f;
    hash[31] = 0x01;
    hash
}

#[test]
fn test_best_block_is_deobfuscated_and_reversed() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .best_block(block_hash_bytes())
        .build()?;

    let mut db = ChainstateDb::open(&fixture.path())?;
    let hash = db.best_block(&fixture_key())?.expect("best block present");
    let shown = hash.to_string();
    assert!(shown.starts_with("01"));
    assert!(shown.ends_with("6f"));
    Ok(())
}

#[test]
fn test_short_best_block_record_is_an_error() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .raw(BEST_BLOCK_KEY, &[0x01, 0x02])
        .build()?;

    let mut db = ChainstateDb::open(&fixture.path())?;
    assert!(db.best_block(&fixture_key()).is_err());
    Ok(())
}

#[test]
fn test_inspect_reports_key_and_best_block() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .best_block(block_hash_bytes())
        .utxo(UtxoSpec::p2pkh(1, 0, 1))
        .build()?;

    let info = ChainstateInfo::read(&fixture.path())?;
    assert_eq!(info.obfuscation_key.as_deref(), Some(fixture_key().as_bytes()));
    assert!(info.best_block.is_some());
    Ok(())
}

#[test]
fn test_inspect_without_metadata() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .without_obfuscation_key()
        .build()?;

    let info = ChainstateInfo::read(&fixture.path())?;
    assert_eq!(info.obfuscation_key, None);
    assert_eq!(info.best_block, None);
    Ok(())
}

#[test]
fn test_reopen_sees_same_records() -> anyhow::Result<()> {
    use chainstate_dump::database::RecordSource;

    let fixture = ChainstateFixtureBuilder::new()
        .utxo(UtxoSpec::p2pkh(1, 0, 1))
        .utxo(UtxoSpec::p2sh(2, 0, 1))
        .build()?;

    for _ in 0..2 {
        let mut db = ChainstateDb::open(&fixture.path())?;
        let mut batch = Vec::new();
        assert_eq!(db.fill_batch(&mut batch, 10)?, 2);
    }
    Ok(())
}
