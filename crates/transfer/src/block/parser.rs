// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Block -> [`TransferReport`].
//!
//! Failure policy:
//! - an extrinsic whose call is missing from the schema is skipped;
//! - any other decode failure empties the block's transfer list (the
//!   timestamp read so far is kept) and is logged, never returned;
//! - fee and address failures blank the affected field;
//! - event fetch or decode failures are returned, since every status would
//!   otherwise be a guess.

use super::correlate::{self, CorrelationError, EventSource};
use super::types::{RawBlock, TransferCandidate, TransferReport};
use crate::address;
use crate::codec::{self, CallData, DecodeError};
use crate::context::ChainContext;
use crate::extrinsic::{DecodedCall, decode_extrinsic, tx_hash};
use crate::rpc::RpcError;
use crate::types::{BlockHash, Record, Value, ValueError};
use crate::utils::hex_with_prefix;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("Failed to correlate events for block {number}: {source}")]
    Correlation {
        number: u64,
        #[source]
        source: CorrelationError,
    },
}

/// Fee estimation for a raw extrinsic against its parent block.
pub trait FeeEstimator {
    /// Partial fee as a decimal string.
    fn partial_fee(&self, extrinsic_hex: &str, parent_hash: &BlockHash) -> Result<String, RpcError>;
}

pub struct BlockParser<'a> {
    ctx: Arc<ChainContext>,
    fees: &'a dyn FeeEstimator,
    events: &'a dyn EventSource,
}

/// What the extrinsic pass collects before events are consulted.
#[derive(Default)]
struct Extraction {
    timestamp: u64,
    candidates: Vec<TransferCandidate>,
}

impl<'a> BlockParser<'a> {
    pub fn new(
        ctx: Arc<ChainContext>,
        fees: &'a dyn FeeEstimator,
        events: &'a dyn EventSource,
    ) -> Self {
        Self { ctx, fees, events }
    }

    pub fn parse(&self, block: &RawBlock) -> Result<TransferReport, BlockError> {
        let mut extraction = Extraction::default();

        if let Err(e) = self.extract(block, &mut extraction) {
            tracing::warn!(
                block = block.number,
                error = %e,
                "Failed to decode block extrinsics, reporting no transfers"
            );
            extraction.candidates.clear();
        }

        let transfers = if extraction.candidates.is_empty() {
            Vec::new()
        } else {
            correlate::correlate(self.events, &self.ctx, &block.hash, extraction.candidates)
                .map_err(|source| BlockError::Correlation {
                    number: block.number,
                    source,
                })?
        };

        Ok(TransferReport {
            height: block.number,
            parent_hash: block.parent_hash,
            hash: block.hash,
            timestamp: extraction.timestamp,
            transfers,
        })
    }

    fn extract(&self, block: &RawBlock, out: &mut Extraction) -> Result<(), DecodeError> {
        for (index, raw) in block.extrinsics.iter().enumerate() {
            let decoded = match decode_extrinsic(&self.ctx, raw) {
                Ok(decoded) => decoded,
                Err(e) if e.is_unknown_call() => {
                    tracing::debug!(
                        block = block.number,
                        extrinsic_index = index,
                        error = %e,
                        "Skipping extrinsic with unknown call"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(now) = timestamp_of(&decoded)? {
                out.timestamp = now;
                continue;
            }

            let transfers = match (decoded.module.as_str(), decoded.function.as_str()) {
                (module, function) if is_transfer(module, function) => {
                    transfer_targets(&decoded.args).into_iter().collect()
                }
                ("Utility", "batch") => batch_transfers(&decoded.args),
                (module, function) => {
                    tracing::trace!(
                        extrinsic_index = index,
                        module,
                        function,
                        "Ignoring non-transfer call"
                    );
                    continue;
                }
            };

            let transfers: Vec<_> = transfers
                .into_iter()
                .filter_map(|(dest, amount)| match codec::account_id(&dest) {
                    Some(to) => Some((to, amount)),
                    None => {
                        tracing::debug!(
                            block = block.number,
                            extrinsic_index = index,
                            dest = ?dest,
                            "Skipping transfer to an address without an account id"
                        );
                        None
                    }
                })
                .collect();

            if transfers.is_empty() {
                continue;
            }

            let base = self.candidate_base(block, index as u32, raw, &decoded);
            for (to, amount) in transfers {
                out.candidates.push(TransferCandidate {
                    to: self.render_address(&to),
                    amount,
                    ..base.clone()
                });
            }
        }
        Ok(())
    }

    /// Fields shared by every transfer of one extrinsic. The fee is queried
    /// here, once per extrinsic.
    fn candidate_base(
        &self,
        block: &RawBlock,
        extrinsic_index: u32,
        raw: &[u8],
        decoded: &DecodedCall,
    ) -> TransferCandidate {
        let from = match decoded.signer_public_key() {
            Some(key) => self.render_address(&key),
            None => String::new(),
        };

        let fee = self
            .fees
            .partial_fee(&hex_with_prefix(raw), &block.parent_hash)
            .unwrap_or_else(|e| {
                tracing::warn!(
                    block = block.number,
                    extrinsic_index,
                    error = %e,
                    "Failed to query partial fee"
                );
                String::new()
            });

        TransferCandidate {
            extrinsic_index,
            from,
            to: String::new(),
            amount: String::new(),
            fee,
            signature: decoded.signature_hex(),
            nonce: decoded.nonce(),
            era: decoded.era().descriptor(),
            txid: tx_hash(raw),
            length: decoded.length,
        }
    }

    fn render_address(&self, key: &[u8; 32]) -> String {
        address::encode(key, self.ctx.prefix()).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "Failed to encode address");
            String::new()
        })
    }
}

/// The `now` argument of a Timestamp pallet call, whatever the call is named.
fn timestamp_of(decoded: &DecodedCall) -> Result<Option<u64>, ValueError> {
    if decoded.module != "Timestamp" {
        return Ok(None);
    }
    let Some(now) = decoded.args.get("now") else {
        return Ok(None);
    };
    let now = now.as_u128()?;
    u64::try_from(now)
        .map(Some)
        .map_err(|_| ValueError::OutOfRange(now.to_string()))
}

fn is_transfer(module: &str, function: &str) -> bool {
    module == "Balances" && matches!(function, "transfer" | "transfer_keep_alive")
}

/// `(dest, value)` of a transfer call, or nothing when either is missing.
fn transfer_targets(args: &Record) -> Option<(Value, String)> {
    let dest = args.get("dest")?;
    let amount = args.get("value")?.as_u128().ok()?;
    Some((dest.clone(), amount.to_string()))
}

/// Transfers inside `Utility.batch`, one per transfer sub-call.
fn batch_transfers(args: &Record) -> Vec<(Value, String)> {
    let Some(Value::List(calls)) = args.get("calls") else {
        return Vec::new();
    };

    let mut transfers = Vec::new();
    for call in calls {
        let call = match CallData::from_value(call) {
            Ok(call) => call,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed batch item");
                continue;
            }
        };
        if !is_transfer(&call.module, &call.function) {
            continue;
        }
        transfers.extend(transfer_targets(&call.args));
    }
    transfers
}
