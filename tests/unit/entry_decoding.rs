//! Record decoding through the public assembler API

use crate::common::{fixture_key, fixture_key_record, plain_value, UtxoSpec};
use chainstate_dump::decoder::key::encode_key;
use chainstate_dump::decoder::{DecodeError, DecodeOptions, EntryAssembler, ObfuscationKey};
use chainstate_dump::types::{
    AggregateStats, FieldSelection, Network, OutputField, RawRecord, ScriptType,
};

fn assembler(fields: &str, network: Network) -> EntryAssembler {
    let options = DecodeOptions {
        fields: FieldSelection::parse(fields).unwrap(),
        network,
        p2pk_addresses: false,
    };
    EntryAssembler::new(Some(fixture_key()), options).unwrap()
}

#[test]
fn test_key_record_prefix_is_dropped() {
    let key = ObfuscationKey::from_record(&fixture_key_record()).unwrap();
    assert_eq!(key, fixture_key());
}

#[test]
fn test_genesis_style_p2pkh_address() {
    let hash = hex::decode("62e907b15cbf27d5425399ebf6f0fb50ebb88f18").unwrap();
    let record = RawRecord::new(
        encode_key(&[0x3b; 32], 0),
        fixture_key().deobfuscate(&plain_value(0, true, 5_000_000_000, 0, &hash)),
    );

    let mut stats = AggregateStats::new();
    let entry = assembler("txid,height,coinbase,amount,address", Network::Mainnet)
        .assemble(&record, &mut stats)
        .unwrap();

    let value = entry.value.as_ref().unwrap();
    assert_eq!(value.height, 0);
    assert!(value.is_coinbase);
    assert_eq!(value.amount, 5_000_000_000);
    assert_eq!(
        entry.address.as_deref(),
        Some("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
    );
    assert_eq!(stats.count(ScriptType::P2PKH), 1);
    assert_eq!(stats.total_amount(), 5_000_000_000);
}

#[test]
fn test_testnet_p2sh_address() {
    let hash = hex::decode("748284390f9e263a4b766a75d0633c50426eb875").unwrap();
    let record = RawRecord::new(
        encode_key(&[0x01; 32], 3),
        fixture_key().deobfuscate(&plain_value(2_000_000, false, 12_345, 1, &hash)),
    );

    let entry = assembler("type,address", Network::Testnet)
        .assemble(&record, &mut AggregateStats::new())
        .unwrap();
    assert_eq!(
        entry.address.as_deref(),
        Some("2N3sGiyscxqd3r6DQSbgXT738ZwhUpBqkej")
    );
    assert_eq!(entry.field_text(OutputField::Type, 1), "p2sh");
}

#[test]
fn test_taproot_fixture_output() {
    let record = UtxoSpec::p2tr(0x42, 1, 330).record(&fixture_key());
    let entry = assembler("type,script,address", Network::Mainnet)
        .assemble(&record, &mut AggregateStats::new())
        .unwrap();

    assert_eq!(entry.value.as_ref().unwrap().script_type, ScriptType::P2TR);
    assert!(entry.address.as_deref().unwrap().starts_with("bc1p"));
}

#[test]
fn test_txid_is_displayed_reversed() {
    let mut txid = [0u8; 32];
    txid[0] = 0xaa;
    txid[31] = 0x01;
    let record = RawRecord::new(encode_key(&txid, 70_000), Vec::new());

    let entry = assembler("txid,vout", Network::Mainnet)
        .assemble(&record, &mut AggregateStats::new())
        .unwrap();
    let text = entry.field_text(OutputField::Txid, 1);
    assert!(text.starts_with("01"));
    assert!(text.ends_with("aa"));
    assert_eq!(entry.field_text(OutputField::Vout, 1), "70000");
}

#[test]
fn test_truncated_record_fails_without_counting() {
    let mut plain = UtxoSpec::p2pkh(7, 0, 1_000).plain_value();
    plain.truncate(plain.len() - 5);
    let record = RawRecord::new(encode_key(&[7; 32], 0), fixture_key().deobfuscate(&plain));

    let mut stats = AggregateStats::new();
    let result = assembler("amount,type", Network::Mainnet).assemble(&record, &mut stats);
    assert!(matches!(result, Err(DecodeError::TruncatedValue { .. })));
    assert_eq!(stats.total_outputs(), 0);
}

#[test]
fn test_short_key_is_rejected() {
    let record = RawRecord::new(vec![0x43, 0x01, 0x02], Vec::new());
    let result = assembler("txid", Network::Mainnet).assemble(&record, &mut AggregateStats::new());
    assert!(matches!(result, Err(DecodeError::TruncatedKey { .. })));
}
