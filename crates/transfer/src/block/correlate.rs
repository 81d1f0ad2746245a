// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross-check transfer candidates against the block's events.
//!
//! A candidate becomes `success` only when a `Balances.Transfer` event with
//! the same extrinsic index and recipient exists and the extrinsic did not
//! emit `System.ExtrinsicFailed`. Event values replace the decoded ones on a
//! match. Each event confirms at most one candidate, in block order, so a
//! batch paying the same account twice needs two events.

use super::events::{EventRecord, decode_event_records};
use super::types::{TransferCandidate, TransferEntry, TransferStatus};
use crate::address;
use crate::codec::DecodeError;
use crate::context::ChainContext;
use crate::rpc::RpcError;
use crate::types::{BlockHash, ValueError};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("Failed to fetch events: {0}")]
    FetchFailed(#[from] RpcError),

    #[error("Failed to decode events: {0}")]
    DecodeFailed(#[from] DecodeError),

    #[error("Unexpected event layout: {0}")]
    InvalidEvent(#[from] ValueError),
}

/// Where the raw `System.Events` storage value of a block comes from.
pub trait EventSource {
    /// `None` when the block has no events stored.
    fn events_storage(&self, block_hash: &BlockHash) -> Result<Option<Vec<u8>>, RpcError>;
}

/// A `Balances.Transfer` event attached to an extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EventTransfer {
    extrinsic_index: u32,
    from: String,
    to: String,
    amount: String,
}

/// Fetch and decode the block's events, then resolve every candidate.
pub fn correlate(
    source: &dyn EventSource,
    ctx: &ChainContext,
    block_hash: &BlockHash,
    candidates: Vec<TransferCandidate>,
) -> Result<Vec<TransferEntry>, CorrelationError> {
    let records = match source.events_storage(block_hash)? {
        Some(bytes) => decode_event_records(&ctx.schema, &bytes)?,
        None => Vec::new(),
    };
    resolve(ctx, &records, candidates)
}

/// Resolve candidates against already decoded events.
pub fn resolve(
    ctx: &ChainContext,
    records: &[EventRecord],
    candidates: Vec<TransferCandidate>,
) -> Result<Vec<TransferEntry>, CorrelationError> {
    let failed: HashSet<u32> = records
        .iter()
        .filter(|r| r.is("System", "ExtrinsicFailed"))
        .filter_map(|r| r.phase.extrinsic_index())
        .collect();

    let mut transfers = event_transfers(ctx, records)?
        .into_iter()
        .map(Some)
        .collect::<Vec<_>>();

    let entries = candidates
        .into_iter()
        .map(|candidate| {
            let mut entry = TransferEntry::pending(candidate);

            let matched = transfers.iter_mut().find(|slot| {
                slot.as_ref().is_some_and(|t| {
                    t.extrinsic_index == entry.extrinsic_index && t.to == entry.to
                })
            });

            if let Some(transfer) = matched.and_then(Option::take) {
                tracing::trace!(
                    extrinsic_index = entry.extrinsic_index,
                    from = %transfer.from,
                    to = %transfer.to,
                    "Transfer confirmed by event"
                );
                entry.status = if failed.contains(&entry.extrinsic_index) {
                    TransferStatus::Fail
                } else {
                    TransferStatus::Success
                };
                entry.amount = transfer.amount;
                entry.to = transfer.to;
            }

            entry
        })
        .collect();

    Ok(entries)
}

fn event_transfers(
    ctx: &ChainContext,
    records: &[EventRecord],
) -> Result<Vec<EventTransfer>, CorrelationError> {
    let prefix = ctx.prefix();
    let mut transfers = Vec::new();

    for record in records.iter().filter(|r| r.is("Balances", "Transfer")) {
        let Some(extrinsic_index) = record.phase.extrinsic_index() else {
            continue;
        };

        let from = address::encode(record.fields.field("from")?.as_bytes()?, prefix);
        let to = address::encode(record.fields.field("to")?.as_bytes()?, prefix);
        let (from, to) = match (from, to) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(
                    extrinsic_index,
                    error = %e,
                    "Skipping transfer event with unencodable address"
                );
                continue;
            }
        };

        transfers.push(EventTransfer {
            extrinsic_index,
            from,
            to,
            amount: record.fields.field("amount")?.as_u128()?.to_string(),
        });
    }

    Ok(transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::events::Phase;
    use crate::block::events::tests::{events_storage, failed_event, success_event, transfer_event};
    use crate::metadata::RuntimeSchema;
    use crate::types::{Record, Value};

    fn ctx() -> ChainContext {
        ChainContext::new(RuntimeSchema::from_metadata(crate::test_runtime::metadata()).unwrap())
    }

    fn addr(byte: u8) -> String {
        address::encode(&[byte; 32], 42).unwrap()
    }

    fn candidate(index: u32, to: u8, amount: &str) -> TransferCandidate {
        TransferCandidate {
            extrinsic_index: index,
            from: addr(1),
            to: addr(to),
            amount: amount.to_string(),
            fee: "100".into(),
            signature: "0x00".into(),
            nonce: 0,
            era: "0x00".into(),
            txid: format!("0x{index:064x}"),
            length: 100,
        }
    }

    struct Storage(Option<Vec<u8>>);

    impl EventSource for Storage {
        fn events_storage(&self, _: &BlockHash) -> Result<Option<Vec<u8>>, RpcError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_event_amount_wins() {
        let source = Storage(Some(events_storage(&[
            transfer_event(Phase::ApplyExtrinsic(3), [1; 32], [2; 32], 999),
            success_event(3),
        ])));
        let entries = correlate(
            &source,
            &ctx(),
            &BlockHash::default(),
            vec![candidate(3, 2, "1000")],
        )
        .unwrap();

        assert_eq!(entries[0].status, TransferStatus::Success);
        assert_eq!(entries[0].amount, "999");
        assert_eq!(entries[0].kind, "transfer");
    }

    #[test]
    fn test_failed_extrinsic_stays_fail() {
        let source = Storage(Some(events_storage(&[
            transfer_event(Phase::ApplyExtrinsic(1), [1; 32], [2; 32], 5),
            failed_event(1),
        ])));
        let entries =
            correlate(&source, &ctx(), &BlockHash::default(), vec![candidate(1, 2, "5")]).unwrap();
        assert_eq!(entries[0].status, TransferStatus::Fail);
        assert_eq!(entries[0].amount, "5");
    }

    #[test]
    fn test_unmatched_candidates_keep_decoded_values() {
        let source = Storage(Some(events_storage(&[
            // wrong recipient
            transfer_event(Phase::ApplyExtrinsic(1), [1; 32], [9; 32], 5),
            // wrong extrinsic
            transfer_event(Phase::ApplyExtrinsic(2), [1; 32], [2; 32], 5),
            // not attached to an extrinsic
            transfer_event(Phase::Finalization, [1; 32], [2; 32], 5),
        ])));
        let entries =
            correlate(&source, &ctx(), &BlockHash::default(), vec![candidate(1, 2, "7")]).unwrap();
        assert_eq!(entries[0].status, TransferStatus::Fail);
        assert_eq!(entries[0].amount, "7");
        assert_eq!(entries[0].to, addr(2));
    }

    #[test]
    fn test_each_event_confirms_one_candidate() {
        let source = Storage(Some(events_storage(&[transfer_event(
            Phase::ApplyExtrinsic(4),
            [1; 32],
            [2; 32],
            10,
        )])));
        let entries = correlate(
            &source,
            &ctx(),
            &BlockHash::default(),
            vec![candidate(4, 2, "10"), candidate(4, 2, "10")],
        )
        .unwrap();
        assert_eq!(entries[0].status, TransferStatus::Success);
        assert_eq!(entries[1].status, TransferStatus::Fail);
    }

    #[test]
    fn test_missing_storage_means_no_events() {
        let entries = correlate(
            &Storage(None),
            &ctx(),
            &BlockHash::default(),
            vec![candidate(0, 2, "1")],
        )
        .unwrap();
        assert_eq!(entries[0].status, TransferStatus::Fail);
    }

    #[test]
    fn test_undecodable_events_are_an_error() {
        let err = correlate(
            &Storage(Some(vec![4, 0xff])),
            &ctx(),
            &BlockHash::default(),
            vec![candidate(0, 2, "1")],
        )
        .unwrap_err();
        assert!(matches!(err, CorrelationError::DecodeFailed(_)));
    }

    #[test]
    fn test_bad_event_layout_is_an_error() {
        let record = EventRecord {
            phase: Phase::ApplyExtrinsic(0),
            module: "Balances".into(),
            name: "Transfer".into(),
            fields: Record::new().with("from", Value::Number(1)),
            topics: vec![],
        };
        let err = resolve(&ctx(), &[record], vec![candidate(0, 2, "1")]).unwrap_err();
        assert!(matches!(err, CorrelationError::InvalidEvent(_)));
    }

    #[test]
    fn test_short_event_address_is_skipped() {
        let record = EventRecord {
            phase: Phase::ApplyExtrinsic(0),
            module: "Balances".into(),
            name: "Transfer".into(),
            fields: Record::new()
                .with("from", Value::Bytes(vec![1; 20]))
                .with("to", Value::Bytes(vec![2; 32]))
                .with("amount", Value::Number(1)),
            topics: vec![],
        };
        let entries = resolve(&ctx(), &[record], vec![candidate(0, 2, "1")]).unwrap();
        assert_eq!(entries[0].status, TransferStatus::Fail);
    }
}
