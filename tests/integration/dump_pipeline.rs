//! End-to-end dumps from an on-disk chainstate to an output file

use crate::common::{ChainstateFixture, ChainstateFixtureBuilder, UtxoSpec};
use chainstate_dump::decoder::key::encode_key;
use chainstate_dump::processor::{format_summary, ChainstateDumper};
use chainstate_dump::types::{
    DumpConfig, FieldSelection, Network, OutputFormat, ScriptType, SessionStats,
};
use serde_json::Value;
use std::path::PathBuf;

fn sample_chainstate() -> anyhow::Result<ChainstateFixture> {
    ChainstateFixtureBuilder::new()
        .best_block([0x22; 32])
        .utxo(UtxoSpec::p2pkh(1, 0, 5_000_000_000).coinbase())
        .utxo(UtxoSpec::p2sh(2, 1, 120_000))
        .utxo(UtxoSpec::p2tr(3, 0, 330))
        .utxo(UtxoSpec::p2pkh(4, 2, 546))
        .build()
}

fn dump(
    fixture: &ChainstateFixture,
    fields: &str,
    format: OutputFormat,
    network: Option<Network>,
) -> anyhow::Result<(SessionStats, String, PathBuf)> {
    let output = fixture.dir.path().join("out.txt");
    let mut builder = DumpConfig::builder()
        .chainstate_path(fixture.path())
        .output_path(&output)
        .fields(FieldSelection::parse(fields).map_err(anyhow::Error::msg)?)
        .format(format)
        .batch_size(3)
        .workers(2)
        .quiet(true);
    if let Some(network) = network {
        builder = builder.network(network);
    }
    let config = builder.build().map_err(anyhow::Error::msg)?;

    let stats = ChainstateDumper::new(config)?.run_on_path()?;
    let text = std::fs::read_to_string(&output)?;
    Ok((stats, text, output))
}

#[test]
fn test_csv_dump_of_mixed_outputs() -> anyhow::Result<()> {
    let fixture = sample_chainstate()?;
    let (stats, text, _) = dump(
        &fixture,
        "count,vout,height,coinbase,amount,type",
        OutputFormat::Csv,
        None,
    )?;

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "count,vout,height,coinbase,amount,type");
    assert_eq!(lines[1], "1,0,700001,1,5000000000,p2pkh");
    assert_eq!(lines[2], "2,1,700002,0,120000,p2sh");
    assert_eq!(lines[3], "3,0,700003,0,330,p2tr");
    assert_eq!(lines[4], "4,2,700004,0,546,p2pkh");
    assert_eq!(lines.len(), 5);

    assert_eq!(stats.decoded, 4);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.batches_processed, 2);
    assert_eq!(stats.aggregate.count(ScriptType::P2PKH), 2);
    assert_eq!(stats.aggregate.total_amount(), 5_000_120_876);
    Ok(())
}

#[test]
fn test_json_dump_with_addresses() -> anyhow::Result<()> {
    let fixture = sample_chainstate()?;
    let (_, text, _) = dump(
        &fixture,
        "count,txid,type,address",
        OutputFormat::Json,
        None,
    )?;

    let rows: Vec<Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 4);

    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["count", "txid", "type", "address"]);
    assert_eq!(rows[0]["txid"], "01".repeat(32));
    assert!(rows[0]["address"].as_str().unwrap().starts_with('1'));
    assert!(rows[1]["address"].as_str().unwrap().starts_with('3'));
    assert!(rows[2]["address"].as_str().unwrap().starts_with("bc1p"));
    Ok(())
}

#[test]
fn test_testnet_detected_from_directory_name() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let fixture = ChainstateFixtureBuilder::new()
        .utxo(UtxoSpec::p2pkh(1, 0, 1_000))
        .utxo(UtxoSpec::p2tr(2, 0, 330))
        .build()?;
    let testnet_path = dir.path().join("testnet3").join("chainstate");
    std::fs::create_dir_all(testnet_path.parent().unwrap())?;
    std::fs::rename(fixture.path(), &testnet_path)?;

    let output = dir.path().join("testnet.csv");
    let config = DumpConfig::builder()
        .chainstate_path(&testnet_path)
        .output_path(&output)
        .fields(FieldSelection::parse("address").map_err(anyhow::Error::msg)?)
        .quiet(true)
        .build()
        .map_err(anyhow::Error::msg)?;
    assert_eq!(config.network, Network::Testnet);

    ChainstateDumper::new(config)?.run_on_path()?;
    let text = std::fs::read_to_string(&output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "address");
    assert!(lines[1].starts_with('m') || lines[1].starts_with('n'));
    assert!(lines[2].starts_with("tb1p"));
    Ok(())
}

#[test]
fn test_key_only_dump_needs_no_obfuscation_key() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .without_obfuscation_key()
        .utxo(UtxoSpec::p2pkh(8, 4, 1))
        .build()?;

    let (stats, text, _) = dump(&fixture, "txid,vout", OutputFormat::Csv, None)?;
    assert_eq!(stats.decoded, 1);
    assert_eq!(text, format!("txid,vout\n{},4\n", "08".repeat(32)));

    let result = dump(&fixture, "txid,amount", OutputFormat::Csv, None);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_bad_records_are_skipped() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new()
        .utxo(UtxoSpec::p2pkh(1, 0, 1_000))
        // Value too short to hold a script
        .raw(&encode_key(&[0x05; 32], 0), &[0x00])
        .utxo(UtxoSpec::p2pkh(9, 0, 2_000))
        .build()?;

    let fields = "count,amount,type";
    let (stats, text, _) = dump(&fixture, fields, OutputFormat::Csv, Some(Network::Mainnet))?;
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.decoded, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(text, "count,amount,type\n1,1000,p2pkh\n2,2000,p2pkh\n");

    let summary = format_summary(&stats, &FieldSelection::parse(fields).unwrap());
    assert!(summary.contains("Total UTXOs: 2"));
    assert!(summary.contains("Skipped records: 1"));
    assert!(summary.contains("Total BTC:   0.00003000"));
    Ok(())
}

#[test]
fn test_empty_chainstate_writes_header_only() -> anyhow::Result<()> {
    let fixture = ChainstateFixtureBuilder::new().build()?;
    let (stats, text, _) = dump(&fixture, "count,txid", OutputFormat::Csv, None)?;
    assert_eq!(stats.decoded, 0);
    assert_eq!(text, "count,txid\n");
    Ok(())
}

#[test]
fn test_sqlite_dump_with_run_extremes() -> anyhow::Result<()> {
    let fixture = sample_chainstate()?;
    let output = fixture.dir.path().join("utxos.sqlite");
    let config = DumpConfig::builder()
        .chainstate_path(fixture.path())
        .output_path(&output)
        .fields(FieldSelection::parse("txid,vout,height,amount,type").map_err(anyhow::Error::msg)?)
        .format(OutputFormat::Sqlite)
        .batch_size(3)
        .workers(2)
        .quiet(true)
        .build()
        .map_err(anyhow::Error::msg)?;
    let fields = config.fields.clone();

    let stats = ChainstateDumper::new(config)?.run_on_path()?;
    assert_eq!(stats.keys_scanned, 6);
    assert_eq!(stats.decoded, 4);

    let connection = rusqlite::Connection::open(&output)?;
    let rows: i64 = connection.query_row("SELECT COUNT(*) FROM utxos", [], |row| row.get(0))?;
    assert_eq!(rows, 4);
    let (height, amount, script_type): (i64, i64, String) = connection.query_row(
        "SELECT height, amount, type FROM utxos WHERE txid = ?1 AND vout = 1",
        [&"02".repeat(32)],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    assert_eq!((height, amount, script_type.as_str()), (700_002, 120_000, "p2sh"));

    let summary = format_summary(&stats, &fields);
    assert!(summary.contains("Keys scanned: 6"));
    assert!(summary.contains("Max height:  700004"));
    assert!(summary.contains("Max vout:    2"));
    assert!(summary.contains("Max script:  34 bytes"));
    Ok(())
}
