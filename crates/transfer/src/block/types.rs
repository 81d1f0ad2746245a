// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::types::BlockHash;
use serde::Serialize;

/// A block as fetched from the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub number: u64,
    pub parent_hash: BlockHash,
    pub hash: BlockHash,
    /// Length-prefixed extrinsics in block order.
    pub extrinsics: Vec<Vec<u8>>,
}

/// A transfer read from an extrinsic, before events confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCandidate {
    pub extrinsic_index: u32,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub fee: String,
    pub signature: String,
    pub nonce: u64,
    pub era: String,
    pub txid: String,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEntry {
    pub extrinsic_index: u32,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub fee: String,
    pub nonce: u64,
    pub era: String,
    pub signature: String,
    pub status: TransferStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub txid: String,
    pub length: usize,
}

impl TransferEntry {
    /// Unconfirmed entry: status `fail` until an event proves otherwise.
    pub fn pending(candidate: TransferCandidate) -> Self {
        Self {
            extrinsic_index: candidate.extrinsic_index,
            from: candidate.from,
            to: candidate.to,
            amount: candidate.amount,
            fee: candidate.fee,
            nonce: candidate.nonce,
            era: candidate.era,
            signature: candidate.signature,
            status: TransferStatus::Fail,
            kind: crate::consts::TRANSFER_TYPE.to_string(),
            txid: candidate.txid,
            length: candidate.length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    pub height: u64,
    pub parent_hash: BlockHash,
    pub hash: BlockHash,
    /// Milliseconds, from `Timestamp.set`; 0 when the block has none.
    pub timestamp: u64,
    pub transfers: Vec<TransferEntry>,
}
