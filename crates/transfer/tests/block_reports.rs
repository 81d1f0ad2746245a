// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use common::*;
use substrate_transfer::address;
use substrate_transfer::block::TransferStatus;
use substrate_transfer::context::ChainContext;
use substrate_transfer::extrinsic::{Era, tx_hash};
use substrate_transfer::rpc::{ClientError, RpcError, TransferClient};
use substrate_transfer::transaction::Call;
use substrate_transfer::types::Record;

const BOB: [u8; 32] = [0xb0; 32];
const CHARLIE: [u8; 32] = [0xc0; 32];
const NOW: u64 = 1_700_000_006_000;

fn client(node: MockNode) -> TransferClient<MockNode> {
    TransferClient::new(node, ChainContext::new(schema()))
}

fn polkadot_address(key: [u8; 32]) -> String {
    address::encode(&key, 0).unwrap()
}

#[test]
fn transfer_at_index_three_is_confirmed_by_its_events() {
    let remark = Call::from_values(
        &schema(),
        "System",
        "remark",
        Record::new().with("remark", substrate_transfer::types::Value::Bytes(b"hi".to_vec())),
    )
    .unwrap();
    let chill = Call::from_values(&schema(), "Staking", "chill", Record::new()).unwrap();
    let raw_transfer = signed(&transfer(BOB, 500), 7, 0x11);

    let extrinsics = vec![
        timestamp(NOW),
        signed(&remark, 1, 0x01),
        signed(&chill, 2, 0x02),
        raw_transfer.clone(),
    ];
    let events = events_storage(&[
        success_event(0),
        success_event(1),
        success_event(2),
        transfer_event(3, SENDER, BOB, 777),
        success_event(3),
    ]);
    let client = client(MockNode::new("polkadot").with_block(42, &extrinsics, Some(events)));

    let report = client.block_by_number(42).unwrap();

    assert_eq!(report.height, 42);
    assert_eq!(report.hash, block_hash(42));
    assert_eq!(report.parent_hash, parent_hash(42));
    assert_eq!(report.timestamp, NOW);
    assert_eq!(report.transfers.len(), 1);

    let entry = &report.transfers[0];
    assert_eq!(entry.extrinsic_index, 3);
    assert_eq!(entry.from, polkadot_address(SENDER));
    assert_eq!(entry.to, polkadot_address(BOB));
    // the event amount wins over the decoded one
    assert_eq!(entry.amount, "777");
    assert_eq!(entry.fee, PARTIAL_FEE);
    assert_eq!(entry.nonce, 7);
    assert_eq!(entry.era, Era::mortal(90, 64).descriptor());
    assert_eq!(entry.signature, format!("0x{}", "11".repeat(64)));
    assert_eq!(entry.txid, tx_hash(&raw_transfer));
    assert_eq!(entry.status, TransferStatus::Success);
    assert_eq!(entry.kind, "transfer");

    // only the transfer costs a fee query
    assert_eq!(client.transport().count("payment_queryInfo"), 1);
}

#[test]
fn batch_items_share_extrinsic_fields() {
    let batch = Call::utility_batch(&schema(), &[transfer(BOB, 10), transfer(CHARLIE, 20)]).unwrap();
    let raw = signed(&batch, 3, 0x22);
    let events = events_storage(&[
        transfer_event(1, SENDER, BOB, 10),
        transfer_event(1, SENDER, CHARLIE, 20),
        success_event(1),
    ]);
    let client = client(MockNode::new("polkadot").with_block(7, &[timestamp(NOW), raw.clone()], Some(events)));

    let report = client.block_by_number(7).unwrap();
    assert_eq!(report.transfers.len(), 2);

    let (first, second) = (&report.transfers[0], &report.transfers[1]);
    assert_eq!(first.to, polkadot_address(BOB));
    assert_eq!(first.amount, "10");
    assert_eq!(second.to, polkadot_address(CHARLIE));
    assert_eq!(second.amount, "20");

    for entry in &report.transfers {
        assert_eq!(entry.extrinsic_index, 1);
        assert_eq!(entry.signature, first.signature);
        assert_eq!(entry.nonce, 3);
        assert_eq!(entry.txid, tx_hash(&raw));
        assert_eq!(entry.fee, PARTIAL_FEE);
        assert_eq!(entry.status, TransferStatus::Success);
    }
    assert_eq!(client.transport().count("payment_queryInfo"), 1);
}

#[test]
fn transfers_in_one_block_take_their_own_event_amounts() {
    let to_bob = signed(&transfer(BOB, 10), 1, 0x23);
    let to_charlie = signed(&transfer(CHARLIE, 20), 2, 0x24);
    let events = events_storage(&[
        transfer_event(2, SENDER, CHARLIE, 22),
        success_event(2),
        transfer_event(1, SENDER, BOB, 11),
        success_event(1),
    ]);
    let client = client(MockNode::new("polkadot").with_block(
        8,
        &[timestamp(NOW), to_bob.clone(), to_charlie.clone()],
        Some(events),
    ));

    let report = client.block_by_number(8).unwrap();
    assert_eq!(report.transfers.len(), 2);

    let (first, second) = (&report.transfers[0], &report.transfers[1]);
    assert_eq!(first.extrinsic_index, 1);
    assert_eq!(first.to, polkadot_address(BOB));
    assert_eq!(first.amount, "11");
    assert_eq!(first.txid, tx_hash(&to_bob));
    assert_eq!(first.status, TransferStatus::Success);

    assert_eq!(second.extrinsic_index, 2);
    assert_eq!(second.to, polkadot_address(CHARLIE));
    assert_eq!(second.amount, "22");
    assert_eq!(second.txid, tx_hash(&to_charlie));
    assert_eq!(second.status, TransferStatus::Success);

    assert_eq!(client.transport().count("payment_queryInfo"), 2);
}

#[test]
fn identical_batch_transfers_cannot_share_one_event() {
    let batch = Call::utility_batch(&schema(), &[transfer(BOB, 10), transfer(BOB, 10)]).unwrap();
    let events = events_storage(&[transfer_event(1, SENDER, BOB, 10), success_event(1)]);
    let client = client(MockNode::new("polkadot").with_block(
        10,
        &[timestamp(NOW), signed(&batch, 4, 0x25)],
        Some(events),
    ));

    let report = client.block_by_number(10).unwrap();
    assert_eq!(report.transfers.len(), 2);

    let (first, second) = (&report.transfers[0], &report.transfers[1]);
    assert_eq!(first.to, second.to);
    assert_eq!(first.txid, second.txid);
    assert_eq!(first.amount, "10");
    assert_eq!(second.amount, "10");
    assert_eq!(first.status, TransferStatus::Success);
    assert_eq!(second.status, TransferStatus::Fail);
}

#[test]
fn failed_extrinsic_reports_fail_status() {
    let raw = signed(&transfer(BOB, 500), 0, 0x33);
    let events = events_storage(&[failed_event(1)]);
    let client = client(MockNode::new("polkadot").with_block(9, &[timestamp(NOW), raw], Some(events)));

    let report = client.block_by_number(9).unwrap();
    assert_eq!(report.transfers.len(), 1);
    assert_eq!(report.transfers[0].status, TransferStatus::Fail);
    assert_eq!(report.transfers[0].amount, "500");
}

#[test]
fn block_without_transfers_skips_event_lookup() {
    let chill = Call::from_values(&schema(), "Staking", "chill", Record::new()).unwrap();
    let client = client(MockNode::new("polkadot").with_block(
        11,
        &[timestamp(NOW), signed(&chill, 0, 0x44)],
        None,
    ));

    let report = client.block_by_number(11).unwrap();
    assert!(report.transfers.is_empty());
    assert_eq!(report.timestamp, NOW);
    assert_eq!(client.transport().count("state_getStorage"), 0);
}

#[test]
fn parsing_a_block_twice_gives_the_same_report() {
    let raw = signed(&transfer(BOB, 500), 0, 0x55);
    let events = events_storage(&[transfer_event(1, SENDER, BOB, 500), success_event(1)]);
    let client = client(MockNode::new("polkadot").with_block(12, &[timestamp(NOW), raw], Some(events)));

    let first = client.block_by_number(12).unwrap();
    let second = client.block_by_hash(&block_hash(12)).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn undecodable_extrinsic_degrades_block_to_no_transfers() {
    let raw = signed(&transfer(BOB, 500), 0, 0x66);
    // declared length larger than the bytes that follow
    let broken = vec![0x10, 0x84, 0x00];
    let client = client(MockNode::new("polkadot").with_block(
        13,
        &[timestamp(NOW), raw, broken],
        Some(events_storage(&[])),
    ));

    let report = client.block_by_number(13).unwrap();
    assert_eq!(report.timestamp, NOW);
    assert!(report.transfers.is_empty());
}

#[test]
fn prefix_override_changes_rendered_addresses() {
    let raw = signed(&transfer(BOB, 1), 0, 0x77);
    let events = events_storage(&[transfer_event(1, SENDER, BOB, 1), success_event(1)]);
    let client = client(MockNode::new("polkadot").with_block(14, &[timestamp(NOW), raw], Some(events)));

    client.set_prefix(Some(2));
    let report = client.block_by_number(14).unwrap();
    assert_eq!(report.transfers[0].to, address::encode(&BOB, 2).unwrap());
    assert_eq!(report.transfers[0].status, TransferStatus::Success);
}

#[test]
fn closed_connection_is_retried_once() {
    let node = MockNode::new("polkadot").with_block(15, &[timestamp(NOW)], None);
    node.close_next.set(1);
    let client = client(node);

    let report = client.block_by_number(15).unwrap();
    assert_eq!(report.timestamp, NOW);
    assert_eq!(client.transport().reconnects.get(), 1);
}

#[test]
fn missing_block_is_an_error() {
    let client = client(MockNode::new("polkadot"));
    assert!(matches!(
        client.block_by_number(99),
        Err(ClientError::Rpc(RpcError::BlockNotFound(99)))
    ));
}
